//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `DOCUDRAFT` prefix with
//! `__` separating nested values, e.g. `DOCUDRAFT__ORACLE__API_KEY=sk-...`.

mod error;
mod oracle;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use oracle::OracleConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Oracle provider configuration.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// State storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file if present, then environment variables with the
    /// `DOCUDRAFT` prefix.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DOCUDRAFT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.oracle.validate()
    }
}
