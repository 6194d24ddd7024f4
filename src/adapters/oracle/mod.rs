//! Oracle adapters.

pub mod http;
pub mod mock;

pub use http::{HttpOracle, HttpOracleConfig};
pub use mock::{FailingOracle, ScriptedOracle};
