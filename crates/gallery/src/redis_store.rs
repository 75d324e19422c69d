//! Redis-backed store
//!
//! Keys are namespaced as `genboard:{key}` so several tools can share one
//! Redis database.

use anyhow::Context;
use async_trait::async_trait;
use genboard_common::{Error, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::store::KeyValueStore;

const KEY_PREFIX: &str = "genboard";

/// Storage backend for a Redis server
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the server at `redis_url`
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        info!("Connected to Redis at {}", redis_url);

        Ok(Self { conn })
    }

    fn namespaced(key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

/// Values that are not UTF-8 are treated as absent
fn decode_value(key: &str, bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring non UTF-8 value stored under {}: {}", key, e);
            None
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();

        let bytes: Option<Vec<u8>> = conn
            .get(Self::namespaced(key))
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(bytes.and_then(|bytes| decode_value(key, bytes)))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = conn
            .set(Self::namespaced(key), value)
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        debug!("Stored {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = conn
            .del(Self::namespaced(key))
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(())
    }
}
