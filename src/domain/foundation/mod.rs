//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{SchemaError, ValidationError};
pub use ids::ConversationKey;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
