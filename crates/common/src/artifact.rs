//! Artifact records
//!
//! Records are immutable once created: a collection only ever gains new
//! records at the front or loses whole records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::id::ArtifactId;

/// Style tag for text generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Creative,
    Professional,
    Casual,
    Technical,
    Marketing,
}

impl TextStyle {
    pub const ALL: [TextStyle; 5] = [
        TextStyle::Creative,
        TextStyle::Professional,
        TextStyle::Casual,
        TextStyle::Technical,
        TextStyle::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextStyle::Creative => "creative",
            TextStyle::Professional => "professional",
            TextStyle::Casual => "casual",
            TextStyle::Technical => "technical",
            TextStyle::Marketing => "marketing",
        }
    }
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown text style: {}", s))
    }
}

/// A generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageArtifact {
    pub id: ArtifactId,

    /// Prompt the image was generated from
    pub prompt: String,

    /// Where the binary content can be fetched
    pub url: String,

    pub created_at: DateTime<Utc>,
}

impl ImageArtifact {
    /// Create a new image record with a fresh id
    pub fn new(prompt: String, url: String) -> Self {
        Self {
            id: ArtifactId::generate(),
            prompt,
            url,
            created_at: Utc::now(),
        }
    }
}

/// A generated piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextArtifact {
    pub id: ArtifactId,

    /// Prompt the text was generated from
    pub prompt: String,

    /// Generated body
    pub text: String,

    /// Requested style
    #[serde(rename = "type")]
    pub style: TextStyle,

    pub created_at: DateTime<Utc>,
}

impl TextArtifact {
    /// Create a new text record with a fresh id
    pub fn new(prompt: String, text: String, style: TextStyle) -> Self {
        Self {
            id: ArtifactId::generate(),
            prompt,
            text,
            style,
            created_at: Utc::now(),
        }
    }
}
