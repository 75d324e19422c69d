//! Change notifications emitted by a generation session.
//!
//! The presentation layer subscribes and re-renders from the session's
//! getters; events carry just enough to know what changed.

use genboard_common::ArtifactId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A request was dispatched to the gateway
    GenerationStarted { kind: &'static str, prompt: String },

    /// A new artifact was prepended to the collection
    ArtifactAdded { kind: &'static str, id: ArtifactId },

    /// The gateway call failed; the collection is unchanged
    GenerationFailed { kind: &'static str, message: String },

    ArtifactRemoved { kind: &'static str, id: ArtifactId },

    /// The collection was emptied and its persisted copy deleted
    Cleared { kind: &'static str },

    ContentLoaded { id: ArtifactId },

    /// Image content failed to load; recorded as a permanent per-item failure
    ContentFailed { id: ArtifactId },
}
