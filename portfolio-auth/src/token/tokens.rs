//! Token payloads exchanged with the auth endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Tokens issued by `/api/auth/login` and `/api/auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token for obtaining new access tokens.
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    /// Token type (usually "bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Body returned by `/api/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: SecretString,
}

/// Body sent to `/api/auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_token_pair_from_login_response() {
        let pair: TokenPair = serde_json::from_str(
            r#"{"access_token":"a1","refresh_token":"r1","token_type":"bearer"}"#,
        )
        .unwrap();

        assert_eq!(pair.access_token.expose_secret(), "a1");
        assert_eq!(pair.refresh_token.unwrap().expose_secret(), "r1");
    }

    #[test]
    fn test_token_pair_without_refresh_token() {
        let pair: TokenPair = serde_json::from_str(r#"{"access_token":"a1"}"#).unwrap();

        assert!(pair.refresh_token.is_none());
        assert_eq!(pair.token_type, "bearer");
    }
}
