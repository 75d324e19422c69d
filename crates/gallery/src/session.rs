//! Generation session controller
//!
//! One session per artifact kind. The session is the single authority over
//! which artifacts exist and whether a request is running. It allows at most
//! one outstanding gateway call at a time; image and text sessions do not
//! share that flag.

use genboard_common::{ArtifactId, Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::events::SessionEvent;
use crate::gateway::GenerationGateway;
use crate::kind::ArtifactKind;
use crate::lifecycle::{ContentState, LifecycleTracker};
use crate::store::CollectionStore;

const EVENT_CAPACITY: usize = 64;

/// Holds the in-flight flag for the duration of one request.
///
/// The flag is released on drop, so every exit path clears it: success,
/// failure, panic, or the request future being dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct GenerationSession<K: ArtifactKind> {
    gateway: Arc<dyn GenerationGateway<K>>,
    store: CollectionStore,
    /// Newest first
    artifacts: Mutex<Vec<K::Artifact>>,
    in_flight: AtomicBool,
    draft: Mutex<String>,
    tracker: Mutex<LifecycleTracker>,
    events: broadcast::Sender<SessionEvent>,
}

impl<K: ArtifactKind> GenerationSession<K> {
    /// Open a session, loading whatever collection was persisted before.
    ///
    /// A store that cannot be read is logged and the session starts empty.
    pub async fn open(gateway: Arc<dyn GenerationGateway<K>>, store: CollectionStore) -> Self {
        let artifacts = match store.load::<K::Artifact>(K::STORAGE_KEY).await {
            Ok(artifacts) => artifacts,
            Err(e) => {
                error!("Failed to load {} collection: {}", K::LABEL, e);
                Vec::new()
            }
        };

        // Ids issued from here on must not collide with persisted ones
        for artifact in &artifacts {
            K::id(artifact).observe();
        }

        info!("Opened {} session with {} artifact(s)", K::LABEL, artifacts.len());

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            gateway,
            store,
            artifacts: Mutex::new(artifacts),
            in_flight: AtomicBool::new(false),
            draft: Mutex::new(String::new()),
            tracker: Mutex::new(LifecycleTracker::new()),
            events,
        }
    }

    /// Generate a new artifact from `prompt`.
    ///
    /// Fails with [`Error::Validation`] for a blank prompt and
    /// [`Error::InFlight`] while another request of this kind is running;
    /// neither reaches the gateway. A gateway failure leaves the collection
    /// untouched and is reported as [`Error::Generation`].
    pub async fn generate(&self, prompt: &str, options: K::Options) -> Result<K::Artifact> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::Validation);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            debug!("Rejected {} generation: request already in flight", K::LABEL);
            Error::InFlight
        })?;

        info!("Generating {} for prompt: {}", K::LABEL, prompt);
        self.emit(SessionEvent::GenerationStarted {
            kind: K::LABEL,
            prompt: prompt.to_string(),
        });

        let payload = match self.gateway.generate(prompt, &options).await {
            Ok(payload) => payload,
            Err(failure) => {
                let message = failure
                    .message
                    .unwrap_or_else(|| K::FALLBACK_ERROR.to_string());
                warn!("{} generation failed: {}", K::LABEL, message);
                self.emit(SessionEvent::GenerationFailed {
                    kind: K::LABEL,
                    message: message.clone(),
                });
                return Err(Error::Generation(message));
            }
        };

        let artifact = K::create(prompt.to_string(), options, payload);
        let id = K::id(&artifact).clone();

        {
            let mut artifacts = self.artifacts.lock().await;
            artifacts.insert(0, artifact.clone());
            self.persist(&artifacts).await;
        }

        if K::TRACKS_CONTENT {
            self.tracker.lock().await.mark_loading(id.clone());
        }
        self.draft.lock().await.clear();

        info!("Generated {} {}", K::LABEL, id);
        self.emit(SessionEvent::ArtifactAdded { kind: K::LABEL, id });

        Ok(artifact)
    }

    /// Generate again from an existing artifact's prompt and options.
    ///
    /// The original stays in the collection; the result is a new artifact
    /// at the front.
    pub async fn regenerate(&self, artifact: &K::Artifact) -> Result<K::Artifact> {
        self.generate(K::prompt(artifact), K::options(artifact)).await
    }

    /// [`regenerate`](Self::regenerate) for the artifact with `id`
    pub async fn regenerate_by_id(&self, id: &ArtifactId) -> Result<K::Artifact> {
        let artifact = self
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.regenerate(&artifact).await
    }

    /// Remove the artifact with `id`. Returns false when there was none.
    pub async fn remove(&self, id: &ArtifactId) -> bool {
        {
            let mut artifacts = self.artifacts.lock().await;
            let Some(index) = artifacts.iter().position(|a| K::id(a) == id) else {
                debug!("No {} artifact {} to remove", K::LABEL, id);
                return false;
            };

            artifacts.remove(index);
            self.persist(&artifacts).await;
        }

        self.tracker.lock().await.forget(id);

        info!("Removed {} {}", K::LABEL, id);
        self.emit(SessionEvent::ArtifactRemoved {
            kind: K::LABEL,
            id: id.clone(),
        });
        true
    }

    /// Empty the collection and delete its persisted copy
    pub async fn clear(&self) {
        {
            let mut artifacts = self.artifacts.lock().await;
            artifacts.clear();
            self.persist(&artifacts).await;
        }

        self.tracker.lock().await.reset();

        info!("Cleared {} collection", K::LABEL);
        self.emit(SessionEvent::Cleared { kind: K::LABEL });
    }

    /// Write the collection, or delete the entry when it is empty.
    ///
    /// Failures are logged, not returned: the in-memory collection stays
    /// authoritative and the next mutation writes it again.
    async fn persist(&self, artifacts: &[K::Artifact]) {
        let result = if artifacts.is_empty() {
            self.store.clear(K::STORAGE_KEY).await
        } else {
            self.store.save(K::STORAGE_KEY, artifacts).await
        };

        if let Err(e) = result {
            error!("Failed to persist {} collection: {}", K::LABEL, e);
        }
    }

    /// Presentation confirmed the artifact's content rendered
    pub async fn content_loaded(&self, id: &ArtifactId) -> Result<()> {
        self.require(id).await?;
        if !K::TRACKS_CONTENT {
            return Ok(());
        }

        if self.tracker.lock().await.mark_loaded(id) {
            self.emit(SessionEvent::ContentLoaded { id: id.clone() });
        }
        Ok(())
    }

    /// Presentation could not load the artifact's content.
    ///
    /// Recorded as a permanent failure for this artifact only; the in-flight
    /// flag and other artifacts are unaffected. Content that already loaded
    /// stays loaded.
    pub async fn content_failed(&self, id: &ArtifactId) -> Result<()> {
        self.require(id).await?;
        if !K::TRACKS_CONTENT {
            return Ok(());
        }

        if self.tracker.lock().await.mark_errored(id.clone()) {
            warn!("Content failed to load for {} {}", K::LABEL, id);
            self.emit(SessionEvent::ContentFailed { id: id.clone() });
        }
        Ok(())
    }

    /// The recorded [`Error::ContentLoad`] for `id`, if its content failed
    pub async fn content_error(&self, id: &ArtifactId) -> Option<Error> {
        match self.content_state(id).await {
            ContentState::Errored => Some(Error::ContentLoad(id.to_string())),
            _ => None,
        }
    }

    pub async fn content_state(&self, id: &ArtifactId) -> ContentState {
        self.tracker.lock().await.state(id)
    }

    async fn require(&self, id: &ArtifactId) -> Result<()> {
        let artifacts = self.artifacts.lock().await;
        if artifacts.iter().any(|a| K::id(a) == id) {
            Ok(())
        } else {
            Err(Error::NotFound(id.to_string()))
        }
    }

    /// Snapshot of the collection, newest first
    pub async fn artifacts(&self) -> Vec<K::Artifact> {
        self.artifacts.lock().await.clone()
    }

    pub async fn get(&self, id: &ArtifactId) -> Option<K::Artifact> {
        self.artifacts
            .lock()
            .await
            .iter()
            .find(|a| K::id(a) == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.artifacts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.lock().await.is_empty()
    }

    /// Whether a request of this kind is outstanding
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Prompt text the user is editing; cleared after a successful generate
    pub async fn draft(&self) -> String {
        self.draft.lock().await.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().await = text.into();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; getters remain the source of truth
        let _ = self.events.send(event);
    }
}
