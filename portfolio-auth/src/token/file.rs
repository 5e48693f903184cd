//! Token store persisted as a JSON file.

use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::*;
use tokio::sync::Mutex;

use super::{StorageKey, TokenStore};
use crate::error::{storage_error, Error, StorageErrorKind};

/// Token store backed by a JSON object on disk, keyed by `StorageKey::as_str`.
///
/// The file is loaded once on open and rewritten on every change through a
/// temporary file and a rename, so a crash never leaves half a session behind.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                storage_error(
                    StorageErrorKind::Serialization,
                    &format!("Invalid session file {}: {}", path.display(), e),
                )
            })?,
            Err(e) if e.kind() == IoErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Opened session file {}", path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| {
            storage_error(StorageErrorKind::Serialization, &e.to_string())
        })?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<(), Error> {
        self.set_many(vec![(key, value)]).await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), Error> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key.as_str()).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn set_many(&self, new_entries: Vec<(StorageKey, String)>) -> Result<(), Error> {
        let mut entries = self.entries.lock().await;
        let mut updated = entries.clone();
        for (key, value) in new_entries {
            updated.insert(key.as_str().to_string(), value);
        }

        // Only swap in the new state once it is on disk.
        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut entries = self.entries.lock().await;
        if entries.is_empty() {
            return Ok(());
        }

        self.persist(&BTreeMap::new()).await?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("session.json")).await.unwrap();

        assert!(store.get(StorageKey::AccessToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).await.unwrap();
        store
            .set_many(vec![
                (StorageKey::AccessToken, "access".to_string()),
                (StorageKey::RefreshToken, "refresh".to_string()),
            ])
            .await
            .unwrap();
        drop(store);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "access");
        assert_eq!(raw["refreshToken"], "refresh");

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(StorageKey::RefreshToken).await.unwrap().as_deref(),
            Some("refresh")
        );
    }

    #[tokio::test]
    async fn test_clear_removes_every_key_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).await.unwrap();
        store
            .set_many(vec![
                (StorageKey::AccessToken, "a".to_string()),
                (StorageKey::RefreshToken, "r".to_string()),
                (StorageKey::User, "{\"id\":1}".to_string()),
            ])
            .await
            .unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        for key in StorageKey::ALL {
            assert!(reopened.get(key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).await.err().unwrap();
        assert_eq!(
            err.error_kind,
            crate::error::ErrorKind::Storage(StorageErrorKind::Serialization)
        );
    }
}
