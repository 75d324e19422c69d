//! The two artifact kinds a session can manage

use genboard_common::{ArtifactId, ImageArtifact, TextArtifact, TextStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Describes one kind of generated artifact.
///
/// A session is generic over its kind; the kind decides the record type,
/// the per-request options and where the collection is persisted.
pub trait ArtifactKind: Send + Sync + 'static {
    /// Persisted record
    type Artifact: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Request options besides the prompt
    type Options: Clone + Debug + Send + Sync + 'static;

    /// Short name used in logs and events
    const LABEL: &'static str;

    /// Key of the persisted collection
    const STORAGE_KEY: &'static str;

    /// Whether artifacts carry binary content that loads separately
    const TRACKS_CONTENT: bool;

    /// Message reported when the gateway gives no reason for a failure
    const FALLBACK_ERROR: &'static str;

    /// Build a fresh record from a successful generation
    fn create(prompt: String, options: Self::Options, payload: String) -> Self::Artifact;

    fn id(artifact: &Self::Artifact) -> &ArtifactId;

    fn prompt(artifact: &Self::Artifact) -> &str;

    /// Options needed to repeat the request that produced `artifact`
    fn options(artifact: &Self::Artifact) -> Self::Options;
}

/// Images: payload is a URL whose content loads asynchronously
#[derive(Debug, Clone, Copy)]
pub struct ImageKind;

impl ArtifactKind for ImageKind {
    type Artifact = ImageArtifact;
    type Options = ();

    const LABEL: &'static str = "image";
    const STORAGE_KEY: &'static str = "generated-images";
    const TRACKS_CONTENT: bool = true;
    const FALLBACK_ERROR: &'static str = "Failed to generate image. Please try again.";

    fn create(prompt: String, _options: (), payload: String) -> ImageArtifact {
        ImageArtifact::new(prompt, payload)
    }

    fn id(artifact: &ImageArtifact) -> &ArtifactId {
        &artifact.id
    }

    fn prompt(artifact: &ImageArtifact) -> &str {
        &artifact.prompt
    }

    fn options(_artifact: &ImageArtifact) {}
}

/// Text: payload is the generated body, tagged with a style
#[derive(Debug, Clone, Copy)]
pub struct TextKind;

impl ArtifactKind for TextKind {
    type Artifact = TextArtifact;
    type Options = TextStyle;

    const LABEL: &'static str = "text";
    const STORAGE_KEY: &'static str = "generated-texts";
    const TRACKS_CONTENT: bool = false;
    const FALLBACK_ERROR: &'static str = "Failed to generate text. Please try again.";

    fn create(prompt: String, style: TextStyle, payload: String) -> TextArtifact {
        TextArtifact::new(prompt, payload, style)
    }

    fn id(artifact: &TextArtifact) -> &ArtifactId {
        &artifact.id
    }

    fn prompt(artifact: &TextArtifact) -> &str {
        &artifact.prompt
    }

    fn options(artifact: &TextArtifact) -> TextStyle {
        artifact.style
    }
}
