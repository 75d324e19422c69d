//! File-backed store: one JSON document per key under a profile directory

use async_trait::async_trait;
use genboard_common::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::store::KeyValueStore;

/// Storage backend writing each key to `<root>/<key>.json`
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        info!("Using file store at {}", root.display());

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Store(format!("Invalid store key: {:?}", key)));
        }

        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match String::from_utf8(bytes) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                warn!("Ignoring non UTF-8 data in {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        // Write then rename so a reader never sees a half-written document
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CollectionStore;
    use genboard_common::ImageArtifact;

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        assert!(store.get("generated-images").await.unwrap().is_none());

        store
            .set("generated-images", "[]".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("generated-images").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("generated-images.json").exists());

        store.remove("generated-images").await.unwrap();
        assert!(store.get("generated-images").await.unwrap().is_none());

        // Removing again is fine
        store.remove("generated-images").await.unwrap();
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        store.set("active-tab", "\"image\"".to_string()).await.unwrap();
        store.set("active-tab", "\"text\"".to_string()).await.unwrap();

        assert_eq!(
            store.get("active-tab").await.unwrap().as_deref(),
            Some("\"text\"")
        );
    }

    #[tokio::test]
    async fn test_non_utf8_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("generated-images.json"), [0xff, 0xfe, 0x00, 0x5b]).unwrap();

        assert!(store.get("generated-images").await.unwrap().is_none());

        let collections = CollectionStore::new(std::sync::Arc::new(store));
        let loaded: Vec<ImageArtifact> = collections.load("generated-images").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        // A directory where the document should be cannot be read as a file
        std::fs::create_dir(dir.path().join("generated-texts.json")).unwrap();

        assert!(store.get("generated-texts").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        let result = store.set("../escape", "x".to_string()).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn test_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("profile").join("default");

        let store = FileStore::new(&root).await.unwrap();
        assert!(store.root().is_dir());
    }
}
