//! State storage configuration.

use serde::Deserialize;

/// State storage configuration.
///
/// When `data_dir` is set, conversation state is persisted to disk there;
/// otherwise everything lives in memory for the process lifetime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for file-backed state, if any.
    pub data_dir: Option<String>,
}

impl StorageConfig {
    /// Returns true if state should be persisted to disk.
    pub fn is_persistent(&self) -> bool {
        self.data_dir.as_ref().is_some_and(|d| !d.is_empty())
    }
}
