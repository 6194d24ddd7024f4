//! State store adapters.

pub mod file;
pub mod in_memory;

pub use file::FileStateStore;
pub use in_memory::InMemoryStateStore;
