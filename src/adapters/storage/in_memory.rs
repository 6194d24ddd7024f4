//! In-memory state store, for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError, StoredState};

/// In-memory store keyed by conversation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<ConversationKey, StoredState>>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes everything (useful for tests).
    pub async fn clear(&self) {
        self.states.write().await.clear();
    }

    /// Returns the number of stored conversations.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    /// Returns true when no conversation is stored.
    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: ConversationKey) -> Result<Option<StoredState>, StateStoreError> {
        Ok(self.states.read().await.get(&key).cloned())
    }

    async fn put(&self, key: ConversationKey, stored: StoredState) -> Result<(), StateStoreError> {
        self.states.write().await.insert(key, stored);
        Ok(())
    }

    async fn delete(&self, key: ConversationKey) -> Result<(), StateStoreError> {
        self.states.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::CollectionState;

    #[tokio::test]
    async fn get_returns_none_for_new_conversation() {
        let store = InMemoryStateStore::new();
        assert!(store.get(ConversationKey::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryStateStore::new();
        let key = ConversationKey::new();
        let stored = StoredState::first(CollectionState::start("demand_letter", "basic_info"));
        store.put(key, stored.clone()).await.unwrap();
        let loaded = store.get(key).await.unwrap().unwrap();
        assert_eq!(loaded.state, stored.state);
        assert_eq!(loaded.turn, 1);
    }

    #[tokio::test]
    async fn put_is_last_write_wins() {
        let store = InMemoryStateStore::new();
        let key = ConversationKey::new();
        let first = StoredState::first(CollectionState::idle());
        store.put(key, first.clone()).await.unwrap();
        let second = first.next(CollectionState::start("demand_letter", "basic_info"));
        store.put(key, second.clone()).await.unwrap();
        let loaded = store.get(key).await.unwrap().unwrap();
        assert_eq!(loaded.turn, 2);
        assert_eq!(loaded.state, second.state);
    }

    #[tokio::test]
    async fn delete_removes_the_conversation() {
        let store = InMemoryStateStore::new();
        let key = ConversationKey::new();
        store
            .put(key, StoredState::first(CollectionState::idle()))
            .await
            .unwrap();
        store.delete(key).await.unwrap();
        assert!(store.get(key).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
