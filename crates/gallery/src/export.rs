//! Download files for artifacts

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use genboard_common::{export_filename, Error, ImageArtifact, Result, TextArtifact};
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const IMAGE_EXTENSION: &str = "png";
const TEXT_EXTENSION: &str = "txt";
const DEFAULT_IMAGE_TYPE: &str = "image/png";
const TEXT_TYPE: &str = "text/plain; charset=utf-8";

/// A file ready to hand to the user
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Text artifact as a UTF-8 `.txt` file stamped with the current time
    pub fn from_text(artifact: &TextArtifact) -> Self {
        Self::from_text_at(artifact, Utc::now().timestamp_millis())
    }

    pub fn from_text_at(artifact: &TextArtifact, timestamp_millis: i64) -> Self {
        Self {
            filename: export_filename(&artifact.prompt, timestamp_millis, TEXT_EXTENSION),
            content_type: TEXT_TYPE.to_string(),
            bytes: artifact.text.clone().into_bytes(),
        }
    }

    /// Write into `dir` under the export filename
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;

        info!("Exported {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Downloads image content for export
#[derive(Clone, Default)]
pub struct ContentFetcher {
    client: reqwest::Client,
}

impl ContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the image behind `artifact.url`. `data:` URLs are decoded
    /// locally instead of downloaded.
    pub async fn export_image(&self, artifact: &ImageArtifact) -> Result<ExportedFile> {
        if let Some(inline) = artifact.url.strip_prefix("data:") {
            let (content_type, bytes) = decode_data_url(inline)?;
            return Ok(image_file(artifact, content_type, bytes));
        }

        debug!("Downloading image content from {}", artifact.url);

        let response = self
            .client
            .get(&artifact.url)
            .send()
            .await
            .map_err(|e| Error::Export(format!("Failed to download image: {}", e)))?;

        if !response.status().is_success() {
            warn!("Image download for {} returned {}", artifact.id, response.status());
            return Err(Error::Export(format!(
                "Image download returned {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Export(format!("Failed to read image body: {}", e)))?;

        Ok(image_file(artifact, content_type, bytes.to_vec()))
    }
}

fn image_file(artifact: &ImageArtifact, content_type: String, bytes: Vec<u8>) -> ExportedFile {
    ExportedFile {
        filename: export_filename(
            &artifact.prompt,
            Utc::now().timestamp_millis(),
            IMAGE_EXTENSION,
        ),
        content_type,
        bytes,
    }
}

/// Split `<mime>[;base64],<payload>` (the part after `data:`) into its
/// content type and bytes
fn decode_data_url(inline: &str) -> Result<(String, Vec<u8>)> {
    let (header, payload) = inline
        .split_once(',')
        .ok_or_else(|| Error::Export("Malformed data URL".to_string()))?;

    let (mime, is_base64) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let content_type = if mime.is_empty() {
        DEFAULT_IMAGE_TYPE.to_string()
    } else {
        mime.to_string()
    };

    let bytes = if is_base64 {
        BASE64
            .decode(payload.trim())
            .map_err(|e| Error::Export(format!("Invalid base64 image data: {}", e)))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok((content_type, bytes))
}
