//! File-based state store.
//!
//! One JSON file per conversation under a base directory, for easy
//! navigation and debugging.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError, StoredState};

/// Store that persists each conversation's state as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    base_path: PathBuf,
}

impl FileStateStore {
    /// Creates a store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn state_file_path(&self, key: ConversationKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    async fn ensure_base_dir(&self) -> Result<(), StateStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StateStoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: ConversationKey) -> Result<Option<StoredState>, StateStoreError> {
        let path = self.state_file_path(key);
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateStoreError::Io(e.to_string())),
        };
        let stored = serde_json::from_str(&json)
            .map_err(|e| StateStoreError::DeserializationFailed(e.to_string()))?;
        Ok(Some(stored))
    }

    async fn put(&self, key: ConversationKey, stored: StoredState) -> Result<(), StateStoreError> {
        self.ensure_base_dir().await?;
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| StateStoreError::SerializationFailed(e.to_string()))?;
        fs::write(self.state_file_path(key), json)
            .await
            .map_err(|e| StateStoreError::Io(e.to_string()))
    }

    async fn delete(&self, key: ConversationKey) -> Result<(), StateStoreError> {
        match fs::remove_file(self.state_file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateStoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::CollectionState;
    use tempfile::TempDir;

    #[tokio::test]
    async fn put_then_get_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        let key = ConversationKey::new();
        let stored = StoredState::first(CollectionState::start("demand_letter", "basic_info"));
        store.put(key, stored.clone()).await.unwrap();
        let loaded = store.get(key).await.unwrap().unwrap();
        assert_eq!(loaded.state, stored.state);
    }

    #[tokio::test]
    async fn missing_conversation_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        assert!(store.get(ConversationKey::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        let key = ConversationKey::new();
        store.delete(key).await.unwrap();
        store
            .put(key, StoredState::first(CollectionState::idle()))
            .await
            .unwrap();
        store.delete(key).await.unwrap();
        assert!(store.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_reports_deserialization_failure() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        let key = ConversationKey::new();
        tokio::fs::write(dir.path().join(format!("{}.json", key)), "not json")
            .await
            .unwrap();
        let err = store.get(key).await.unwrap_err();
        assert!(matches!(err, StateStoreError::DeserializationFailed(_)));
    }
}
