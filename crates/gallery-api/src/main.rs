//! Genboard API Service
//!
//! Serves the image and text galleries to the local front-end.

use anyhow::{Context, Result};
use genboard_api::{create_router, AppState, Config};
use genboard_gallery::FunctionClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "genboard=info,genboard_api=debug,genboard_gallery=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Genboard API Service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded - listening on {}",
        config.api_address()
    );
    info!("Generation functions at {}", config.generation_api_url);

    let store = config.open_store().await?;
    info!("Store backend: {:?}", config.store_backend);

    let gateway = Arc::new(
        FunctionClient::new(
            config.generation_api_url.clone(),
            config.generation_api_key.clone(),
        )
        .with_functions(config.image_function.clone(), config.text_function.clone()),
    );

    // Create application state
    let state = AppState::open(gateway, store).await;

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Genboard API listening on {}", config.api_address());
    info!("Health check: http://{}/health", config.api_address());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
