//! Genboard API
//!
//! Local HTTP boundary for the browser front-end. Every route forwards to a
//! generation session or the collection store and renders the result as JSON;
//! no gallery state lives here.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET|PUT /api/tab` - Selected gallery tab
//! - `GET|POST|DELETE /api/images` - List, generate, clear images
//! - `DELETE /api/images/{id}` - Remove one image
//! - `POST /api/images/{id}/regenerate` - Generate again from the same prompt
//! - `POST /api/images/{id}/content` - Report image content loaded/errored
//! - `GET /api/images/{id}/export` - Download the image
//! - The same routes under `/api/texts`, without `content`

pub mod config;
pub mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use genboard_gallery::{
    CollectionStore, ContentFetcher, GenerationGateway, GenerationSession, ImageKind, TextKind,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, StoreBackend};

/// Application state shared across handlers
pub struct AppState {
    pub images: GenerationSession<ImageKind>,
    pub texts: GenerationSession<TextKind>,
    pub store: CollectionStore,
    pub fetcher: ContentFetcher,
}

impl AppState {
    /// Open both sessions against one gateway and one store
    pub async fn open<G>(gateway: Arc<G>, store: CollectionStore) -> Self
    where
        G: GenerationGateway<ImageKind> + GenerationGateway<TextKind> + 'static,
    {
        let images = GenerationSession::<ImageKind>::open(gateway.clone(), store.clone()).await;
        let texts = GenerationSession::<TextKind>::open(gateway, store.clone()).await;

        Self {
            images,
            texts,
            store,
            fetcher: ContentFetcher::new(),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/tab",
            get(handlers::get_tab_handler).put(handlers::set_tab_handler),
        )
        // Images
        .route(
            "/api/images",
            get(handlers::list_images_handler)
                .post(handlers::generate_image_handler)
                .delete(handlers::clear_images_handler),
        )
        .route("/api/images/{id}", delete(handlers::remove_image_handler))
        .route(
            "/api/images/{id}/regenerate",
            post(handlers::regenerate_image_handler),
        )
        .route(
            "/api/images/{id}/content",
            post(handlers::image_content_handler),
        )
        .route(
            "/api/images/{id}/export",
            get(handlers::export_image_handler),
        )
        // Texts
        .route(
            "/api/texts",
            get(handlers::list_texts_handler)
                .post(handlers::generate_text_handler)
                .delete(handlers::clear_texts_handler),
        )
        .route("/api/texts/{id}", delete(handlers::remove_text_handler))
        .route(
            "/api/texts/{id}/regenerate",
            post(handlers::regenerate_text_handler),
        )
        .route("/api/texts/{id}/export", get(handlers::export_text_handler))
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
