//! API request handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use genboard_common::{ArtifactId, Error, ImageArtifact, Tab, TextArtifact, TextStyle};
use genboard_gallery::{ContentState, ExportedFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::AppState;

/// Request to generate an image
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// Request to generate text
#[derive(Debug, Deserialize)]
pub struct GenerateTextRequest {
    pub prompt: String,

    /// Style tag; defaults to creative
    #[serde(rename = "type", default)]
    pub style: TextStyle,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TabPayload {
    pub tab: Tab,
}

/// Outcome of loading an image in the browser
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Loaded,
    Errored,
}

#[derive(Debug, Deserialize)]
pub struct ContentReport {
    pub status: ContentStatus,
}

/// Image record plus its content state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    #[serde(flatten)]
    pub artifact: ImageArtifact,
    pub content_state: ContentState,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageView>,
    pub generating: bool,
}

#[derive(Debug, Serialize)]
pub struct TextsResponse {
    pub texts: Vec<TextArtifact>,
    pub generating: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            err if err.is_user_correctable() => StatusCode::BAD_REQUEST,
            Error::InFlight => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Generation(_) | Error::Export(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", err);
        }

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

fn attachment(file: ExportedFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    (
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

/// Health check
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "genboard"
    }))
}

pub async fn get_tab_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TabPayload>, ApiError> {
    let tab = state.store.load_tab().await?;
    Ok(Json(TabPayload { tab }))
}

pub async fn set_tab_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TabPayload>,
) -> Result<StatusCode, ApiError> {
    state.store.save_tab(payload.tab).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List images, newest first
pub async fn list_images_handler(State(state): State<Arc<AppState>>) -> Json<ImagesResponse> {
    let mut images = Vec::new();
    for artifact in state.images.artifacts().await {
        let content_state = state.images.content_state(&artifact.id).await;
        images.push(ImageView {
            artifact,
            content_state,
        });
    }

    Json(ImagesResponse {
        images,
        generating: state.images.is_generating(),
    })
}

/// Generate a new image
pub async fn generate_image_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateImageRequest>,
) -> Result<(StatusCode, Json<ImageArtifact>), ApiError> {
    let artifact = state.images.generate(&payload.prompt, ()).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

pub async fn clear_images_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.images.clear().await;
    StatusCode::NO_CONTENT
}

pub async fn remove_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let removed = state.images.remove(&ArtifactId::from(id)).await;
    Json(RemoveResponse { removed })
}

pub async fn regenerate_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ImageArtifact>), ApiError> {
    info!("Regenerating image {}", id);

    let artifact = state.images.regenerate_by_id(&ArtifactId::from(id)).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// Browser reports whether the image content rendered
pub async fn image_content_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(report): Json<ContentReport>,
) -> Result<StatusCode, ApiError> {
    let id = ArtifactId::from(id);

    match report.status {
        ContentStatus::Loaded => state.images.content_loaded(&id).await?,
        ContentStatus::Errored => state.images.content_failed(&id).await?,
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = ArtifactId::from(id);
    let artifact = state
        .images
        .get(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let file = state.fetcher.export_image(&artifact).await?;
    info!("Exporting image {} as {}", id, file.filename);

    Ok(attachment(file))
}

/// List texts, newest first
pub async fn list_texts_handler(State(state): State<Arc<AppState>>) -> Json<TextsResponse> {
    Json(TextsResponse {
        texts: state.texts.artifacts().await,
        generating: state.texts.is_generating(),
    })
}

/// Generate new text
pub async fn generate_text_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateTextRequest>,
) -> Result<(StatusCode, Json<TextArtifact>), ApiError> {
    let artifact = state.texts.generate(&payload.prompt, payload.style).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

pub async fn clear_texts_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.texts.clear().await;
    StatusCode::NO_CONTENT
}

pub async fn remove_text_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let removed = state.texts.remove(&ArtifactId::from(id)).await;
    Json(RemoveResponse { removed })
}

pub async fn regenerate_text_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<TextArtifact>), ApiError> {
    info!("Regenerating text {}", id);

    let artifact = state.texts.regenerate_by_id(&ArtifactId::from(id)).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

pub async fn export_text_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = ArtifactId::from(id);
    let artifact = state
        .texts
        .get(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let file = ExportedFile::from_text(&artifact);
    info!("Exporting text {} as {}", id, file.filename);

    Ok(attachment(file))
}
