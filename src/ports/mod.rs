//! Ports: trait seams between the core and its external collaborators.

pub mod document_generator;
pub mod oracle;
pub mod state_store;

pub use document_generator::{DocumentError, DocumentGenerator};
pub use oracle::{Oracle, OracleError};
pub use state_store::{StateStore, StateStoreError, StoredState};
