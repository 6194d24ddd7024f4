//! Document generator port: turning a validated record into document text.
//!
//! Invoked only after a record passes full validation at finalize. The core
//! never inspects the produced text; it is handed straight back to the user.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no generator registered for document type '{0}'")]
    UnknownDocumentType(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// Port for generating the final document from a validated record.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Generates document text for a validated, alias-keyed record.
    async fn generate(&self, doc_type_id: &str, record: &Value) -> Result<String, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_names_the_type() {
        let err = DocumentError::UnknownDocumentType("lease_agreement".to_string());
        assert!(err.to_string().contains("lease_agreement"));
    }
}
