//! Persistence port and the collection adapter built on it

use async_trait::async_trait;
use genboard_common::{Result, Tab};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key of the persisted UI tab
pub const TAB_KEY: &str = "active-tab";

/// Durable string key-value storage scoped to one profile
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written or was removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete the entry; deleting a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Serializes artifact collections into a [`KeyValueStore`].
///
/// Stored data that fails to parse is treated as absent: `load` logs it and
/// returns an empty collection instead of an error.
#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Serialize `items` and overwrite whatever is stored under `key`
    pub async fn save<T: Serialize + Sync>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.backend.set(key, json).await?;

        debug!("Saved {} item(s) under {}", items.len(), key);
        Ok(())
    }

    /// Load the collection stored under `key`; empty if absent or corrupt
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(data) = self.backend.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&data) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Ignoring corrupt data stored under {}: {}", key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Remove the entry for `key` entirely
    pub async fn clear(&self, key: &str) -> Result<()> {
        self.backend.remove(key).await?;
        debug!("Cleared {}", key);
        Ok(())
    }

    pub async fn save_tab(&self, tab: Tab) -> Result<()> {
        let json = serde_json::to_string(&tab)?;
        self.backend.set(TAB_KEY, json).await
    }

    /// Last selected tab, falling back to the default when unset or unreadable
    pub async fn load_tab(&self) -> Result<Tab> {
        let Some(data) = self.backend.get(TAB_KEY).await? else {
            return Ok(Tab::default());
        };

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("Ignoring corrupt tab preference: {}", e);
            Tab::default()
        }))
    }
}
