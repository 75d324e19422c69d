//! Per-artifact content state for images
//!
//! An image artifact exists as soon as generation succeeds, but its binary
//! content still has to load from the returned URL. The tracker records
//! which ids are still loading, which loaded and which failed. Loaded and
//! failed are both terminal.

use genboard_common::ArtifactId;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentState {
    /// Content not yet confirmed renderable
    Loading,
    /// Loaded, or never tracked
    Ready,
    /// Content failed to materialize
    Errored,
}

#[derive(Debug, Default)]
pub struct LifecycleTracker {
    loading: HashSet<ArtifactId>,
    loaded: HashSet<ArtifactId>,
    errored: HashSet<ArtifactId>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_settled(&self, id: &ArtifactId) -> bool {
        self.loaded.contains(id) || self.errored.contains(id)
    }

    /// Start tracking a new id. Ignored once the id has settled.
    pub fn mark_loading(&mut self, id: ArtifactId) {
        if self.is_settled(&id) {
            debug!("Ignoring loading mark for settled artifact {}", id);
            return;
        }
        self.loading.insert(id);
    }

    /// Content confirmed renderable. Returns false if the id had already settled.
    pub fn mark_loaded(&mut self, id: &ArtifactId) -> bool {
        if self.is_settled(id) {
            debug!("Ignoring loaded mark for settled artifact {}", id);
            return false;
        }
        self.loading.remove(id);
        self.loaded.insert(id.clone())
    }

    /// Content failed to materialize. Returns false if the id had already settled.
    pub fn mark_errored(&mut self, id: ArtifactId) -> bool {
        if self.is_settled(&id) {
            debug!("Ignoring error mark for settled artifact {}", id);
            return false;
        }
        self.loading.remove(&id);
        self.errored.insert(id)
    }

    pub fn state(&self, id: &ArtifactId) -> ContentState {
        if self.errored.contains(id) {
            ContentState::Errored
        } else if self.loading.contains(id) {
            ContentState::Loading
        } else {
            ContentState::Ready
        }
    }

    pub fn is_loading(&self, id: &ArtifactId) -> bool {
        self.loading.contains(id)
    }

    pub fn is_errored(&self, id: &ArtifactId) -> bool {
        self.errored.contains(id)
    }

    /// Drop all state for an artifact that left the collection
    pub fn forget(&mut self, id: &ArtifactId) {
        self.loading.remove(id);
        self.loaded.remove(id);
        self.errored.remove(id);
    }

    pub fn reset(&mut self) {
        self.loading.clear();
        self.loaded.clear();
        self.errored.clear();
    }
}
