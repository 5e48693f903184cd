//! Authenticated request client with transparent token renewal.

use std::sync::Arc;

use events::{AuthEvent, EventPublisher, LogoutReason};
use log::*;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::{timeout, timeout_at, Instant};

use super::{ClientConfig, RequestOptions, ResponseBody};
use crate::error::{
    auth_expired_error, config_error, request_error, timed_out_error, token_error,
    ConfigErrorKind, Error, RequestErrorKind, TokenErrorKind, GENERIC_FAILURE_MESSAGE,
};
use crate::http::HttpClientBuilder;
use crate::refresh::{Generation, RefreshCoordinator, Renewal};
use crate::session::REFRESH_PATH;
use crate::token::{AccessTokenResponse, Manager, RefreshRequest, TokenStore};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Renewal rounds one logical request may trigger.
const MAX_RENEWALS: u32 = 1;

/// Client for the backend API that attaches the stored bearer token, renews
/// it once on a 401 and bounds every attempt with a timeout.
///
/// Clones share the token store, the event publisher and the renewal state,
/// so concurrent requests from any clone renew through a single refresh call.
#[derive(Clone)]
pub struct RequestClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Manager,
    events: EventPublisher,
    refresh: RefreshCoordinator,
}

/// One completed HTTP exchange.
struct Attempt {
    status: StatusCode,
    is_json: bool,
    body: Vec<u8>,
    /// Whether a bearer token was attached.
    authenticated: bool,
}

/// Error body shape returned by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl RequestClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL, timeouts and retry budget
    /// * `store` - Where the access token, refresh token and cached user live
    /// * `events` - Receives the logout signal when authentication is lost
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        events: EventPublisher,
    ) -> Result<Self, Error> {
        url::Url::parse(&config.base_url).map_err(|e| {
            config_error(
                ConfigErrorKind::InvalidBaseUrl,
                &format!("Invalid base URL {}: {}", config.base_url, e),
            )
        })?;

        let mut config = config;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let http = HttpClientBuilder::new()
            .with_connect_timeout(config.http.connect_timeout)
            .with_user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                tokens: Manager::new(store),
                events,
                refresh: RefreshCoordinator::new(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn tokens(&self) -> &Manager {
        &self.inner.tokens
    }

    pub fn events(&self) -> &EventPublisher {
        &self.inner.events
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.config.base_url, path)
    }

    /// Perform a request and decode its JSON body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, Error> {
        self.send(path, options).await?.into_json()
    }

    /// Perform a request, renewing the access token at most once on a 401.
    pub async fn send(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, Error> {
        let mut remaining = MAX_RENEWALS;

        loop {
            let generation = self.inner.refresh.generation();
            let attempt = self.attempt(path, &options).await?;

            if attempt.status != StatusCode::UNAUTHORIZED {
                return attempt.into_body();
            }

            if remaining == 0 {
                warn!("{} {} still unauthorized after renewal", options.method, path);
                return Err(self.expire_session(None).await);
            }
            remaining -= 1;

            match self.renew(generation).await {
                Ok(()) => {
                    debug!("Retrying {} {} with renewed token", options.method, path);
                }
                Err(e) if attempt.authenticated => {
                    warn!("Token renewal failed: {e}");
                    return Err(self.expire_session(Some(e)).await);
                }
                Err(e) => {
                    // No session was in play, so the 401 is the server's answer
                    // to this request (e.g. wrong credentials on login).
                    debug!("No session to renew for {} {}: {e}", options.method, path);
                    return Err(attempt.into_error());
                }
            }
        }
    }

    async fn attempt(&self, path: &str, options: &RequestOptions) -> Result<Attempt, Error> {
        let access_token = self.inner.tokens.access_token().await?;
        let authenticated = access_token.is_some();

        let mut builder = self
            .inner
            .http
            .request(options.method.clone(), self.url(path))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(token) = &access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = builder.headers(options.headers.clone());
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        trace!("{} {}", options.method, path);

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.contains(JSON_CONTENT_TYPE))
                .unwrap_or(false);
            let body = response.bytes().await?.to_vec();

            Ok::<_, Error>(Attempt {
                status,
                is_json,
                body,
                authenticated,
            })
        };

        match timeout(self.inner.config.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} {} timed out", options.method, path);
                Err(timed_out_error())
            }
        }
    }

    async fn renew(&self, seen: Generation) -> Result<(), Error> {
        let refresh_token = self.inner.tokens.refresh_token().await?.ok_or_else(|| {
            token_error(
                TokenErrorKind::MissingRefreshToken,
                "No refresh token available",
            )
        })?;

        let renewal = self
            .inner
            .refresh
            .renew(seen, self.inner.config.refresh_timeout, || {
                self.refresh_access_token(refresh_token)
            })
            .await?;

        if let Renewal::AlreadyRenewed = renewal {
            debug!("Access token was renewed by a concurrent request");
        }

        Ok(())
    }

    /// Exchange the refresh token for a new access token and store it.
    ///
    /// A rejection by the server clears the whole session; a timeout or
    /// network failure leaves it in place.
    async fn refresh_access_token(&self, refresh_token: SecretString) -> Result<SecretString, Error> {
        info!("Refreshing access token");

        let deadline = Instant::now() + self.inner.config.refresh_timeout;
        let request = self
            .inner
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh_token: refresh_token.expose_secret(),
            });

        let response = timeout_at(deadline, request.send())
            .await
            .map_err(|_| refresh_timed_out())??;

        if !response.status().is_success() {
            warn!("Refresh token rejected with status {}", response.status());
            self.end_session().await?;
            return Err(token_error(
                TokenErrorKind::RefreshRejected,
                &format!("Refresh rejected with status {}", response.status()),
            ));
        }

        let body: AccessTokenResponse = timeout_at(deadline, response.json())
            .await
            .map_err(|_| refresh_timed_out())??;

        self.inner.tokens.set_access_token(&body.access_token).await?;
        self.inner
            .events
            .publish_detached(AuthEvent::TokenRefreshed, std::time::Duration::ZERO);

        info!("Access token refreshed");
        Ok(body.access_token)
    }

    /// Terminal authorization failure: end the session and build the error
    /// to surface.
    async fn expire_session(&self, cause: Option<Error>) -> Error {
        if let Err(e) = self.end_session().await {
            error!("Failed to clear stored session: {e}");
        }

        auth_expired_error(cause)
    }

    /// Clear the stored session and schedule the logout signal. Only the
    /// caller that actually removed a session publishes, so requests failing
    /// together on one lost session produce a single logout.
    async fn end_session(&self) -> Result<(), Error> {
        if self.inner.tokens.clear_all().await? {
            self.inner.events.publish_detached(
                AuthEvent::LoggedOut {
                    reason: LogoutReason::SessionExpired,
                },
                self.inner.config.logout_delay,
            );
        }
        Ok(())
    }
}

impl Attempt {
    fn into_body(self) -> Result<ResponseBody, Error> {
        if !self.status.is_success() {
            return Err(self.into_error());
        }
        ResponseBody::from_bytes(self.is_json, &self.body)
    }

    fn into_error(self) -> Error {
        let message = error_message(&self.body);
        debug!("Request rejected with status {}: {}", self.status, message);
        request_error(
            RequestErrorKind::Rejected {
                status: self.status.as_u16(),
            },
            &message,
        )
    }
}

/// Human-readable message from an error body, falling back to a generic one.
fn error_message(body: &[u8]) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    parsed
        .detail
        .as_ref()
        .and_then(|detail| detail.as_str())
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
        .or(parsed.message.filter(|message| !message.is_empty()))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

fn refresh_timed_out() -> Error {
    token_error(TokenErrorKind::RefreshTimedOut, "Token refresh timed out")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(br#"{"detail":"invalid email or password","message":"other"}"#),
            "invalid email or password"
        );
    }

    #[test]
    fn test_error_message_uses_message_field() {
        assert_eq!(error_message(br#"{"message":"slug taken"}"#), "slug taken");
    }

    #[test]
    fn test_error_message_falls_back_on_unusable_bodies() {
        assert_eq!(error_message(b""), GENERIC_FAILURE_MESSAGE);
        assert_eq!(error_message(b"<html>502</html>"), GENERIC_FAILURE_MESSAGE);
        // Validation errors carry a list, not a string.
        assert_eq!(
            error_message(br#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = RequestClient::new(
            ClientConfig::default().with_base_url("not a url"),
            Arc::new(crate::token::MemoryStore::new()),
            EventPublisher::new(),
        )
        .err()
        .unwrap();

        assert_eq!(
            err.error_kind,
            crate::error::ErrorKind::Config(ConfigErrorKind::InvalidBaseUrl)
        );
    }
}
