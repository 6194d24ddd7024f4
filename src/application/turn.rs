//! The per-turn output contract.

use serde_json::Value;

use crate::domain::collection::CollectionState;

/// Everything one completed turn produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Text to show the user.
    pub assistant_text: String,
    /// State to persist for the next turn.
    pub new_state: CollectionState,
    /// Collected data keyed by external aliases, for UI form pre-fill.
    pub normalized_data: Value,
}

impl TurnOutcome {
    pub fn new(assistant_text: impl Into<String>, new_state: CollectionState, normalized_data: Value) -> Self {
        Self {
            assistant_text: assistant_text.into(),
            new_state,
            normalized_data,
        }
    }
}
