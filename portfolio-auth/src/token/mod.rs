//! Token persistence: the storage trait, its backends and a typed manager on top.

mod file;
mod manager;
mod memory;
mod store;
mod tokens;

pub use file::FileStore;
pub use manager::Manager;
pub use memory::MemoryStore;
pub use store::{StorageKey, TokenStore};
pub use tokens::{AccessTokenResponse, RefreshRequest, TokenPair};
