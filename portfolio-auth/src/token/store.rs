//! Key-value storage trait for session state.

use async_trait::async_trait;

use crate::error::Error;

/// Keys under which session state is persisted.
///
/// The string forms are shared with the web frontend's local storage, so a
/// session file can be inspected with the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::User,
    ];

    /// Get the persisted key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "token",
            StorageKey::RefreshToken => "refreshToken",
            StorageKey::User => "user",
        }
    }
}

/// Trait for storing and retrieving session state.
///
/// Implementations must make `set_many` and `clear` all-or-nothing: a reader
/// never observes an access token from one write next to a refresh token
/// from another. `clear` on an empty store is a no-op.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Retrieve the value stored under `key`.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, Error>;

    /// Store a single value.
    async fn set(&self, key: StorageKey, value: String) -> Result<(), Error>;

    /// Remove a single value.
    async fn remove(&self, key: StorageKey) -> Result<(), Error>;

    /// Store several values in one write.
    async fn set_many(&self, entries: Vec<(StorageKey, String)>) -> Result<(), Error>;

    /// Remove every key in one write.
    async fn clear(&self) -> Result<(), Error>;
}
