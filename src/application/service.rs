//! Conversation service: one engine turn framed by state-store IO.

use std::sync::Arc;
use tracing::debug;

use crate::domain::collection::CollectionState;
use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError, StoredState};

use super::engine::CollectionEngine;
use super::turn::TurnOutcome;

/// Ties the engine to a state store, keyed by conversation.
pub struct CollectionService {
    engine: CollectionEngine,
    store: Arc<dyn StateStore>,
}

impl CollectionService {
    pub fn new(engine: CollectionEngine, store: Arc<dyn StateStore>) -> Self {
        Self { engine, store }
    }

    /// Runs one turn: load last state, compute, persist, reply.
    ///
    /// Persistence is last-write-wins; the transport collaborator must not
    /// issue two concurrent turns for the same conversation.
    pub async fn handle_message(
        &self,
        key: ConversationKey,
        message: &str,
    ) -> Result<TurnOutcome, StateStoreError> {
        let previous = self.store.get(key).await?;
        let state = previous
            .as_ref()
            .map(|p| p.state.clone())
            .unwrap_or_else(CollectionState::idle);
        debug!(%key, phase = ?state.phase, "handling turn");

        let outcome = self.engine.handle_turn(state, message).await;

        let stored = match previous {
            Some(p) => p.next(outcome.new_state.clone()),
            None => StoredState::first(outcome.new_state.clone()),
        };
        self.store.put(key, stored).await?;
        Ok(outcome)
    }
}
