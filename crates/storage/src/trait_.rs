//! Key-value store abstraction.

use async_trait::async_trait;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key cannot be used by this backend
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Backend refused the write (quota, read-only, unavailable)
    #[error("Write rejected for {key:?}: {reason}")]
    Rejected {
        /// Key that was being written
        key: String,
        /// Why the backend refused
        reason: String,
    },
}

/// String key-value store the progress tracker persists through.
///
/// Values are opaque strings; callers own the serialization format.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
