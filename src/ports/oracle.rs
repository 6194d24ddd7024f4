//! Oracle port: the single external language-inference capability.
//!
//! Extraction and classification are delegated wholesale: the core sends a
//! prompt plus a persona and gets free text back. Implementations connect to
//! an actual model API; tests script the replies.

use async_trait::async_trait;

/// Port for the external inference capability.
///
/// The call is the one suspension point per turn and must carry a timeout.
/// Callers never let an `OracleError` escape a turn; every failure degrades
/// to a safe default downstream.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends a prompt and returns the raw reply text.
    async fn call(&self, prompt: &str, persona: &str) -> Result<String, OracleError>;
}

/// Oracle failure modes.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Request exceeded the configured timeout.
    #[error("oracle timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Provider is unreachable or returned a server error.
    #[error("oracle unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("oracle authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Reply arrived but carried no usable content.
    #[error("oracle reply was empty")]
    Empty,

    /// Failed to parse the provider's envelope.
    #[error("parse error: {0}")]
    Parse(String),
}

impl OracleError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OracleError::Timeout { .. } | OracleError::Unavailable { .. } | OracleError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(OracleError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(OracleError::unavailable("down").is_retryable());
        assert!(OracleError::network("reset").is_retryable());
        assert!(!OracleError::AuthenticationFailed.is_retryable());
        assert!(!OracleError::Empty.is_retryable());
    }

    #[test]
    fn errors_display_their_context() {
        let err = OracleError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "oracle timed out after 30s");
        let err = OracleError::unavailable("503");
        assert!(err.to_string().contains("503"));
    }
}
