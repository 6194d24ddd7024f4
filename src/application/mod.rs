//! Application layer: the engine, its oracle gateway and the turn contract.

pub mod engine;
pub mod gateway;
pub mod prompts;
pub mod service;
pub mod turn;

pub use engine::CollectionEngine;
pub use gateway::{DetectedIntent, OracleGateway};
pub use service::CollectionService;
pub use turn::TurnOutcome;
