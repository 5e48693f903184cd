//! In-process token store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageKey, TokenStore};
use crate::error::Error;

/// Token store kept in memory for the lifetime of the process.
///
/// All keys sit behind a single lock, so multi-key writes and `clear` are
/// observed as one step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, Error> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<(), Error> {
        self.entries.write().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), Error> {
        self.entries.write().await.remove(&key);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(StorageKey, String)>) -> Result<(), Error> {
        let mut map = self.entries.write().await;
        map.extend(entries);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();

        store
            .set(StorageKey::AccessToken, "access".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("access")
        );

        store.remove(StorageKey::AccessToken).await.unwrap();
        assert!(store.get(StorageKey::AccessToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_twice_leaves_store_empty() {
        let store = MemoryStore::new();
        store
            .set_many(vec![
                (StorageKey::AccessToken, "a".to_string()),
                (StorageKey::RefreshToken, "r".to_string()),
                (StorageKey::User, "{}".to_string()),
            ])
            .await
            .unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        for key in StorageKey::ALL {
            assert!(store.get(key).await.unwrap().is_none());
        }
    }
}
