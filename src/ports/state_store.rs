//! State store port: persisting one collection state per conversation.
//!
//! The core computes a new state each turn; the store persists it with turn
//! metadata, last-write-wins per conversation key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::collection::CollectionState;
use crate::domain::foundation::{ConversationKey, Timestamp};

/// Errors that can occur during state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("no state stored for conversation {0}")]
    NotFound(ConversationKey),

    #[error("failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("io error: {0}")]
    Io(String),
}

/// A stored state together with its turn metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    /// The collection state after the last completed turn.
    pub state: CollectionState,
    /// Number of turns that have completed for this conversation.
    pub turn: u64,
    /// When the state was last written.
    pub updated_at: Timestamp,
}

impl StoredState {
    /// Wraps a freshly computed state as the first turn.
    pub fn first(state: CollectionState) -> Self {
        Self {
            state,
            turn: 1,
            updated_at: Timestamp::now(),
        }
    }

    /// Produces the successor record for the next completed turn.
    pub fn next(&self, state: CollectionState) -> Self {
        Self {
            state,
            turn: self.turn + 1,
            updated_at: Timestamp::now(),
        }
    }
}

/// Port for persisting and loading collection state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the last stored state, or `None` for a new conversation.
    async fn get(&self, key: ConversationKey) -> Result<Option<StoredState>, StateStoreError>;

    /// Persists the state for a conversation, replacing any previous value.
    async fn put(&self, key: ConversationKey, stored: StoredState) -> Result<(), StateStoreError>;

    /// Deletes all state for a conversation.
    async fn delete(&self, key: ConversationKey) -> Result<(), StateStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_next_advance_turn_counter() {
        let first = StoredState::first(CollectionState::idle());
        assert_eq!(first.turn, 1);
        let second = first.next(CollectionState::idle());
        assert_eq!(second.turn, 2);
    }

    #[test]
    fn not_found_names_the_conversation() {
        let key = ConversationKey::new();
        let err = StateStoreError::NotFound(key);
        assert!(err.to_string().contains(&key.to_string()));
    }
}
