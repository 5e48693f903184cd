use config::Config;
use events::EventPublisher;
use log::info;
use portfolio_auth::token::{FileStore, MemoryStore, TokenStore};
use portfolio_auth::{Error, RequestClient};
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Open the configured session store.
pub async fn init_token_store(config: &Config) -> Result<Arc<dyn TokenStore>, Error> {
    match config.token_store_path() {
        Some(path) => {
            info!("Session file: {}", path.display());
            Ok(Arc::new(FileStore::open(path).await?))
        }
        None => {
            info!("Session kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn init_client(
    config: &Config,
    store: Arc<dyn TokenStore>,
    events: EventPublisher,
) -> Result<RequestClient, Error> {
    info!(
        "API client config: base_url={}, request_timeout={}s, refresh_timeout={}s, \
         logout_delay={}ms",
        config.api_url,
        config.request_timeout_secs,
        config.refresh_timeout_secs,
        config.logout_delay_ms,
    );

    RequestClient::new(config.client_config(), store, events)
}

// Process-wide state handed to every command
#[derive(Clone)]
pub struct AppState {
    pub client: RequestClient,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config, events: EventPublisher) -> Result<Self, Error> {
        let store = init_token_store(&config).await?;
        let client = init_client(&config, store, events)?;

        Ok(Self { client, config })
    }

    pub fn client_ref(&self) -> &RequestClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use portfolio_auth::token::StorageKey;

    fn config(token_store: &str) -> Config {
        Config::try_parse_from(["portfolio_client", "--api-url", "http://127.0.0.1:9"])
            .unwrap()
            .set_token_store(token_store)
    }

    #[tokio::test]
    async fn test_memory_token_store() {
        let store = init_token_store(&config("memory")).await.unwrap();
        store
            .set(StorageKey::AccessToken, "abc".to_string())
            .await
            .unwrap();

        assert_eq!(
            store.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn test_file_token_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let config = config(path.to_str().unwrap());

        init_token_store(&config)
            .await
            .unwrap()
            .set(StorageKey::RefreshToken, "r1".to_string())
            .await
            .unwrap();

        let reopened = init_token_store(&config).await.unwrap();
        assert_eq!(
            reopened
                .get(StorageKey::RefreshToken)
                .await
                .unwrap()
                .as_deref(),
            Some("r1")
        );
    }

    #[tokio::test]
    async fn test_app_state_uses_configured_base_url() {
        let state = AppState::new(config("memory"), EventPublisher::new())
            .await
            .unwrap();

        assert_eq!(state.client_ref().config().base_url, "http://127.0.0.1:9");
    }
}
