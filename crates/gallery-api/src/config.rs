//! Configuration management for Genboard
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use genboard_gallery::{CollectionStore, FileStore, KeyValueStore, MemoryStore, RedisStore};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Where collections are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Lost on exit
    Memory,
    /// JSON files under `store_dir`
    File,
    /// Redis at `redis_url`
    Redis,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            other => anyhow::bail!("Unknown STORE_BACKEND: {} (expected memory, file or redis)", other),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Base URL of the generation functions host
    pub generation_api_url: String,

    /// Key sent with every function call
    pub generation_api_key: Option<String>,

    pub image_function: String,

    pub text_function: String,

    pub store_backend: StoreBackend,

    /// Profile directory for the file backend
    pub store_dir: PathBuf,

    /// Redis connection URL for the redis backend
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            generation_api_url: env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:54321".to_string()),

            generation_api_key: env::var("GENERATION_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),

            image_function: env::var("IMAGE_FUNCTION")
                .unwrap_or_else(|_| "generate-image".to_string()),

            text_function: env::var("TEXT_FUNCTION")
                .unwrap_or_else(|_| "generate-text".to_string()),

            store_backend: env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "file".to_string())
                .parse()?,

            store_dir: env::var("STORE_DIR")
                .unwrap_or_else(|_| "./.genboard".to_string())
                .into(),

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        if !self.generation_api_url.starts_with("http://")
            && !self.generation_api_url.starts_with("https://")
        {
            anyhow::bail!("GENERATION_API_URL must be an http(s) URL");
        }

        if self.image_function.trim().is_empty() || self.text_function.trim().is_empty() {
            anyhow::bail!("IMAGE_FUNCTION and TEXT_FUNCTION must not be empty");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Open the configured persistence backend
    pub async fn open_store(&self) -> Result<CollectionStore> {
        let backend: Arc<dyn KeyValueStore> = match self.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; galleries will not survive a restart");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::File => Arc::new(
                FileStore::new(&self.store_dir)
                    .await
                    .with_context(|| {
                        format!("Failed to open store directory: {}", self.store_dir.display())
                    })?,
            ),
            StoreBackend::Redis => Arc::new(
                RedisStore::new(&self.redis_url)
                    .await
                    .context("Failed to open Redis store")?,
            ),
        };

        Ok(CollectionStore::new(backend))
    }
}
