//! Adapters: concrete implementations of the ports.

pub mod document;
pub mod oracle;
pub mod storage;
