//! Typed access to the session state kept in a `TokenStore`.

use std::sync::Arc;

use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::{StorageKey, TokenPair, TokenStore};
use crate::error::{storage_error, Error, StorageErrorKind};

/// Token manager that reads and writes the access token, refresh token and
/// cached user profile through a shared store.
#[derive(Clone)]
pub struct Manager {
    store: Arc<dyn TokenStore>,
    clearing: Arc<Mutex<()>>,
}

impl Manager {
    /// Create a new token manager over the given storage backend.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            clearing: Arc::new(Mutex::new(())),
        }
    }

    pub async fn access_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self
            .store
            .get(StorageKey::AccessToken)
            .await?
            .map(SecretString::new))
    }

    pub async fn refresh_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self
            .store
            .get(StorageKey::RefreshToken)
            .await?
            .map(SecretString::new))
    }

    /// Replace the access token, leaving the refresh token untouched.
    pub async fn set_access_token(&self, token: &SecretString) -> Result<(), Error> {
        self.store
            .set(StorageKey::AccessToken, token.expose_secret().clone())
            .await
    }

    /// Store a freshly issued token pair in one write.
    pub async fn store_pair(&self, pair: &TokenPair) -> Result<(), Error> {
        let mut entries = vec![(
            StorageKey::AccessToken,
            pair.access_token.expose_secret().clone(),
        )];
        if let Some(refresh) = &pair.refresh_token {
            entries.push((StorageKey::RefreshToken, refresh.expose_secret().clone()));
        }

        self.store.set_many(entries).await
    }

    /// Last known user profile. A cache entry that no longer parses reads as absent.
    pub async fn cached_user<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        let Some(raw) = self.store.get(StorageKey::User).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Ignoring unreadable cached user: {e}");
                Ok(None)
            }
        }
    }

    pub async fn set_cached_user<T: Serialize>(&self, user: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(user)
            .map_err(|e| storage_error(StorageErrorKind::Serialization, &e.to_string()))?;
        self.store.set(StorageKey::User, raw).await
    }

    /// Drop access token, refresh token and cached user together.
    ///
    /// Returns `true` only for the caller that found a session to clear, so
    /// concurrent callers can tell which of them actually ended it.
    pub async fn clear_all(&self) -> Result<bool, Error> {
        let _guard = self.clearing.lock().await;

        let mut had_session = false;
        for key in StorageKey::ALL {
            if self.store.get(key).await?.is_some() {
                had_session = true;
                break;
            }
        }

        debug!("Clearing stored session (present: {had_session})");
        self.store.clear().await?;
        Ok(had_session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryStore;

    fn manager() -> (Arc<MemoryStore>, Manager) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Manager::new(store))
    }

    fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
        TokenPair {
            access_token: SecretString::new(access.to_string()),
            refresh_token: refresh.map(|r| SecretString::new(r.to_string())),
            token_type: "bearer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_pair_writes_both_tokens() {
        let (_, manager) = manager();

        manager.store_pair(&pair("access", Some("refresh"))).await.unwrap();

        assert_eq!(
            manager.access_token().await.unwrap().unwrap().expose_secret(),
            "access"
        );
        assert_eq!(
            manager.refresh_token().await.unwrap().unwrap().expose_secret(),
            "refresh"
        );
    }

    #[tokio::test]
    async fn test_set_access_token_keeps_refresh_token() {
        let (_, manager) = manager();
        manager.store_pair(&pair("old", Some("refresh"))).await.unwrap();

        manager
            .set_access_token(&SecretString::new("new".to_string()))
            .await
            .unwrap();

        assert_eq!(
            manager.access_token().await.unwrap().unwrap().expose_secret(),
            "new"
        );
        assert!(manager.refresh_token().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cached_user_round_trip_and_corruption() {
        let (store, manager) = manager();

        manager
            .set_cached_user(&serde_json::json!({"id": 7, "role": "ADMIN"}))
            .await
            .unwrap();
        let user: serde_json::Value = manager.cached_user().await.unwrap().unwrap();
        assert_eq!(user["id"], 7);

        store
            .set(StorageKey::User, "{not json".to_string())
            .await
            .unwrap();
        let user: Option<serde_json::Value> = manager.cached_user().await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent() {
        let (store, manager) = manager();
        manager.store_pair(&pair("a", Some("r"))).await.unwrap();
        manager
            .set_cached_user(&serde_json::json!({"id": 1}))
            .await
            .unwrap();

        assert!(manager.clear_all().await.unwrap());
        assert!(!manager.clear_all().await.unwrap());

        for key in StorageKey::ALL {
            assert!(store.get(key).await.unwrap().is_none());
        }
    }
}
