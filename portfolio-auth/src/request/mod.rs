//! Authenticated JSON requests against the backend API.

mod client;
mod config;
mod options;
mod response;

pub use client::RequestClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use options::RequestOptions;
pub use response::ResponseBody;
