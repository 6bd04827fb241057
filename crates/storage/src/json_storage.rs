//! JSON file storage implementation.
//!
//! Stores each key as a file in a data directory and keeps a small meta marker
//! per key (version + updated_at) under `meta/`.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use super::{KeyValueStore, StorageError, Result};

/// File-based key-value store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create storage rooted at `root`, creating the data and meta directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Check that `key` can be used with this store.
    pub fn validate_key(key: &str) -> Result<()> {
        check_key(key).map(|_| ())
    }

    /// Current write version of `key`, 0 if it was never written.
    ///
    /// An unreadable meta marker counts as version 0.
    pub async fn version(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(check_key(key)?);
        match fs::read_to_string(&path).await {
            Ok(s) => Ok(serde_json::from_str::<serde_json::Value>(&s)
                .ok()
                .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
                .unwrap_or(0)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    /// Read and increment the per-key version, return the new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let version = self.version(key).await? + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(key), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(check_key(key)?);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(check_key(key)?);

        // Write beside the target and rename so a crash never leaves half a value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        // The value is durable at this point; meta is bookkeeping only.
        match self.bump_version(key).await {
            Ok(version) => debug!(key, version, "stored value"),
            Err(e) => warn!(key, error = %e, "stored value but failed to update meta marker"),
        }
        Ok(())
    }
}

/// Keys become file names, so only allow a conservative character set.
fn check_key(key: &str) -> Result<&str> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(key)
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();

        assert!(store.get("moveInSteps").await.unwrap().is_none());
        assert_eq!(store.version("moveInSteps").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();
        store.set("moveInSteps", r#"{"depositPaid":true}"#).await.unwrap();

        let reopened = JsonFileStore::new(dir.path()).await.unwrap();
        let value = reopened.get("moveInSteps").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"depositPaid":true}"#));
    }

    #[tokio::test]
    async fn test_version_bumps_per_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();

        store.set("moveInSteps", "{}").await.unwrap();
        store.set("moveInSteps", "{}").await.unwrap();

        assert_eq!(store.version("moveInSteps").await.unwrap(), 2);
        assert!(dir.path().join("meta").join("moveInSteps.meta.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_meta_does_not_fail_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();
        let meta = dir.path().join("meta").join("moveInSteps.meta.json");
        std::fs::write(&meta, "garbage").unwrap();

        store.set("moveInSteps", r#"{"depositPaid":true}"#).await.unwrap();

        let value = store.get("moveInSteps").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"depositPaid":true}"#));
        assert_eq!(store.version("moveInSteps").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_meta_does_not_fail_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();
        // A directory where the meta file belongs makes the meta write fail.
        std::fs::create_dir(dir.path().join("meta").join("moveInSteps.meta.json")).unwrap();

        store.set("moveInSteps", "{}").await.unwrap();
        assert_eq!(store.get("moveInSteps").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_unreadable_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();
        std::fs::create_dir(dir.path().join("moveInSteps.json")).unwrap();

        let err = store.get("moveInSteps").await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_validate_key() {
        assert!(JsonFileStore::validate_key("moveInSteps").is_ok());
        assert!(matches!(
            JsonFileStore::validate_key("a/b"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path()).await.unwrap();

        for key in ["", "../escape", ".hidden", "a/b"] {
            let err = store.set(key, "{}").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "{key}");
        }
    }
}
