//! Shared data model for Genboard.
//!
//! Artifact records, their identifiers, the text style tags, the persisted UI
//! tab and the export filename rules live here so the gallery core and the
//! API boundary agree on one wire shape.

pub mod artifact;
pub mod error;
pub mod export;
pub mod id;
pub mod tab;

pub use artifact::{ImageArtifact, TextArtifact, TextStyle};
pub use error::{Error, Result};
pub use export::{export_filename, sanitize_prompt};
pub use id::ArtifactId;
pub use tab::Tab;
