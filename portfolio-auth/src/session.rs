//! Login, registration and session lifecycle on top of the request client.

use events::{AuthEvent, LogoutReason};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{token_error, Error, TokenErrorKind};
use crate::request::{RequestClient, RequestOptions};
use crate::token::{AccessTokenResponse, RefreshRequest, TokenPair};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const ME_PATH: &str = "/api/auth/me";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Authentication operations for the signed-in user.
#[derive(Clone)]
pub struct Session {
    client: RequestClient,
}

impl Session {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// Log in and store the issued token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, Error> {
        let options = RequestOptions::post().json(&LoginRequest { email, password })?;
        let pair: TokenPair = self.client.request(LOGIN_PATH, options).await?;

        self.start(email, &pair).await?;
        Ok(pair)
    }

    /// Create an account and store the issued token pair.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<TokenPair, Error> {
        let options = RequestOptions::post().json(&RegisterRequest {
            email,
            password,
            name,
        })?;
        let pair: TokenPair = self.client.request(REGISTER_PATH, options).await?;

        self.start(email, &pair).await?;
        Ok(pair)
    }

    async fn start(&self, email: &str, pair: &TokenPair) -> Result<(), Error> {
        self.client.tokens().store_pair(pair).await?;
        info!("Signed in as {email}");

        self.client
            .events()
            .publish(AuthEvent::LoggedIn {
                email: email.to_string(),
            })
            .await;
        Ok(())
    }

    /// Forget the stored session. Safe to call when already logged out.
    pub async fn logout(&self) -> Result<(), Error> {
        let was_authenticated = self.is_authenticated().await?;
        self.client.tokens().clear_all().await?;

        if was_authenticated {
            info!("Signed out");
            self.client
                .events()
                .publish(AuthEvent::LoggedOut {
                    reason: LogoutReason::UserRequested,
                })
                .await;
        }
        Ok(())
    }

    /// Fetch the signed-in user and refresh the cached copy.
    pub async fn current_user<U>(&self) -> Result<U, Error>
    where
        U: DeserializeOwned + Serialize,
    {
        let user: U = self.client.request(ME_PATH, RequestOptions::get()).await?;
        self.client.tokens().set_cached_user(&user).await?;
        Ok(user)
    }

    /// Explicitly exchange the stored refresh token for a new access token.
    pub async fn refresh_token(&self) -> Result<SecretString, Error> {
        let refresh_token = self.client.tokens().refresh_token().await?.ok_or_else(|| {
            token_error(
                TokenErrorKind::MissingRefreshToken,
                "No refresh token available",
            )
        })?;

        let options = RequestOptions::post().json(&RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        })?;
        let response: AccessTokenResponse = self.client.request(REFRESH_PATH, options).await?;

        self.client
            .tokens()
            .set_access_token(&response.access_token)
            .await?;
        Ok(response.access_token)
    }

    pub async fn is_authenticated(&self) -> Result<bool, Error> {
        Ok(self.client.tokens().access_token().await?.is_some())
    }

    /// Whether the cached user carries the admin role.
    pub async fn is_admin(&self) -> Result<bool, Error> {
        let user: Option<serde_json::Value> = self.client.tokens().cached_user().await?;

        Ok(user
            .as_ref()
            .and_then(|user| user.get("role"))
            .and_then(|role| role.as_str())
            .map(|role| role.eq_ignore_ascii_case("admin"))
            .unwrap_or(false))
    }

    pub async fn cached_user<U: DeserializeOwned>(&self) -> Result<Option<U>, Error> {
        self.client.tokens().cached_user().await
    }
}
