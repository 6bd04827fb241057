//! Tracker error taxonomy.
//!
//! None of these reach the caller of the tracker; they are logged and the
//! tracker degrades to in-memory behavior.

use movein_core::ParseStateError;
use movein_storage::StorageError;

/// Failures the tracker recovers from locally.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Persisted value is not a flag mapping
    #[error("stored progress under {key:?} is corrupt: {source}")]
    CorruptState {
        /// Storage key that was read
        key: String,
        /// Parse failure
        #[source]
        source: ParseStateError,
    },

    /// Store could not be read
    #[error("failed to read progress under {key:?}: {source}")]
    PersistenceRead {
        /// Storage key that was read
        key: String,
        /// Backend failure
        #[source]
        source: StorageError,
    },

    /// Store rejected a write
    #[error("failed to persist progress under {key:?}: {source}")]
    PersistenceWrite {
        /// Storage key that was written
        key: String,
        /// Backend failure
        #[source]
        source: StorageError,
    },
}
