//! In-memory store.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;
use super::{KeyValueStore, StorageError, Result};

/// Volatile store backed by a shared map.
///
/// Clones share the same entries, so a test can hand one clone to a tracker
/// and inspect or reuse the data through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<Mutex<bool>>,
    reject_reads: Arc<Mutex<bool>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(Mutex::new(entries)),
            ..Self::default()
        }
    }

    /// Make every subsequent `set` fail, as a full or read-only backend would.
    pub async fn reject_writes(&self, reject: bool) {
        *self.reject_writes.lock().await = reject;
    }

    /// Make every subsequent `get` fail, as an unavailable backend would.
    pub async fn reject_reads(&self, reject: bool) {
        *self.reject_reads.lock().await = reject;
    }

    /// Raw value under `key`, bypassing the trait.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if *self.reject_reads.lock().await {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("store is unavailable for {key:?}"),
            )));
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if *self.reject_writes.lock().await {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("moveInSteps").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.set("moveInSteps", "{}").await.unwrap();
        assert_eq!(observer.raw("moveInSteps").await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_rejected_read_is_an_error() {
        let store = MemoryStore::with_entry("moveInSteps", "{}");
        store.reject_reads(true).await;

        let err = store.get("moveInSteps").await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(store.raw("moveInSteps").await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_old_value() {
        let mut store = MemoryStore::with_entry("moveInSteps", "{}");
        store.reject_writes(true).await;

        let err = store.set("moveInSteps", r#"{"depositPaid":true}"#).await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected { .. }));
        assert_eq!(store.get("moveInSteps").await.unwrap().as_deref(), Some("{}"));
    }
}
