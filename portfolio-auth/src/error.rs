//! Error types for the `portfolio-auth` crate.
//!
//! Follows the same pattern as the rest of the workspace: a root `Error` struct
//! holding an error kind and an optional source for chaining. The `Display`
//! output is meant to be shown to a user as-is.

use std::error::Error as StdError;
use std::fmt;

/// Message used when the server gives no usable error text.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

const TIMED_OUT_MESSAGE: &str = "request timed out, please try again later";
const AUTH_EXPIRED_MESSAGE: &str = "authentication expired, please log in again";

/// Top-level error type for portfolio-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in portfolio-auth.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Request(RequestErrorKind),
    Token(TokenErrorKind),
    Storage(StorageErrorKind),
    Config(ConfigErrorKind),
}

/// Errors from issuing a request against the backend API.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestErrorKind {
    /// No complete response arrived within the request timeout.
    TimedOut,
    /// Transport-level failure (offline, DNS, connection reset).
    Network,
    /// Authorization was lost for good; tokens have been cleared.
    AuthenticationExpired,
    /// The server answered with a non-success status.
    Rejected { status: u16 },
    /// A success response whose body could not be decoded.
    InvalidResponse,
    /// The request could not be built.
    Builder,
}

/// Errors from access-token renewal.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenErrorKind {
    MissingRefreshToken,
    RefreshRejected,
    RefreshTimedOut,
    WaitTimedOut,
    RefreshFailed,
}

/// Errors from token storage operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageErrorKind {
    Io,
    Serialization,
}

/// Errors from client configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErrorKind {
    InvalidBaseUrl,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn is_timeout(&self) -> bool {
        self.error_kind == ErrorKind::Request(RequestErrorKind::TimedOut)
    }

    pub fn is_auth_expired(&self) -> bool {
        self.error_kind == ErrorKind::Request(RequestErrorKind::AuthenticationExpired)
    }

    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.error_kind {
            ErrorKind::Request(RequestErrorKind::Rejected { status }) => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Request(RequestErrorKind::TimedOut) => write!(f, "{TIMED_OUT_MESSAGE}"),
            ErrorKind::Request(RequestErrorKind::AuthenticationExpired) => {
                write!(f, "{AUTH_EXPIRED_MESSAGE}")
            }
            ErrorKind::Request(RequestErrorKind::Rejected { .. }) => match &self.source {
                Some(message) => write!(f, "{message}"),
                None => write!(f, "{GENERIC_FAILURE_MESSAGE}"),
            },
            ErrorKind::Request(RequestErrorKind::Network) => match &self.source {
                Some(source) => write!(f, "network error: {source}"),
                None => write!(f, "network error"),
            },
            ErrorKind::Request(kind) => write!(f, "Request error: {:?}", kind),
            ErrorKind::Token(kind) => write!(f, "Token error: {:?}", kind),
            ErrorKind::Storage(kind) => write!(f, "Storage error: {:?}", kind),
            ErrorKind::Config(kind) => write!(f, "Config error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_timeout() {
            ErrorKind::Request(RequestErrorKind::TimedOut)
        } else if err.is_builder() {
            ErrorKind::Request(RequestErrorKind::Builder)
        } else if err.is_decode() {
            ErrorKind::Request(RequestErrorKind::InvalidResponse)
        } else {
            ErrorKind::Request(RequestErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Storage(StorageErrorKind::Io),
        }
    }
}

/// Helper function to create request errors.
pub fn request_error(kind: RequestErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Request(kind),
    }
}

/// The error surfaced once a session is irrecoverably lost.
pub fn auth_expired_error(cause: Option<Error>) -> Error {
    Error {
        source: cause.map(|e| Box::new(e) as Box<dyn StdError + Send + Sync>),
        error_kind: ErrorKind::Request(RequestErrorKind::AuthenticationExpired),
    }
}

pub fn timed_out_error() -> Error {
    Error {
        source: None,
        error_kind: ErrorKind::Request(RequestErrorKind::TimedOut),
    }
}

/// Helper function to create token errors.
pub fn token_error(kind: TokenErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Token(kind),
    }
}

/// Helper function to create storage errors.
pub fn storage_error(kind: StorageErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Storage(kind),
    }
}

/// Helper function to create config errors.
pub fn config_error(kind: ConfigErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Config(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_server_message() {
        let err = request_error(RequestErrorKind::Rejected { status: 400 }, "email already registered");
        assert_eq!(err.to_string(), "email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_rejected_without_message_falls_back() {
        let err = Error {
            source: None,
            error_kind: ErrorKind::Request(RequestErrorKind::Rejected { status: 500 }),
        };
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_timeout_and_auth_expired_messages() {
        assert!(timed_out_error().is_timeout());
        assert!(timed_out_error().to_string().contains("timed out"));

        let err = auth_expired_error(Some(token_error(
            TokenErrorKind::MissingRefreshToken,
            "no refresh token stored",
        )));
        assert!(err.is_auth_expired());
        assert!(err.to_string().contains("authentication expired"));
        assert!(StdError::source(&err).is_some());
    }
}
