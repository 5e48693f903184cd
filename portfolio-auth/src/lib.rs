//! # portfolio-auth
//!
//! Authenticated access to the portfolio site backend:
//! - Token storage behind a pluggable `TokenStore` (in-memory or a JSON session file)
//! - A request client that attaches the bearer token, renews it once on a 401
//!   and bounds every attempt with a timeout
//! - Single-flight renewal, so concurrent 401s cost one refresh call
//! - Login, registration and logout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use events::EventPublisher;
//! use portfolio_auth::{
//!     request::{ClientConfig, RequestClient, RequestOptions},
//!     session::Session,
//!     token::MemoryStore,
//! };
//!
//! let client = RequestClient::new(
//!     ClientConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     EventPublisher::new(),
//! )?;
//! Session::new(client.clone()).login("a@b.com", "Secret123!").await?;
//! let posts: serde_json::Value = client.request("/api/blog/posts", RequestOptions::get()).await?;
//! ```

pub mod error;
pub mod http;
pub mod refresh;
pub mod request;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use request::{ClientConfig, RequestClient, RequestOptions, ResponseBody};
pub use session::Session;
