//! Request client configuration.

use std::time::Duration;

use crate::http::HttpClientConfig;

/// Local development backend, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Deadline for one attempt, covering the send and the body read.
    pub timeout: Duration,
    /// Deadline for the refresh call, and for callers queued behind it.
    pub refresh_timeout: Duration,
    /// Delay before the logout signal is delivered to handlers.
    pub logout_delay: Duration,
    /// Settings for the underlying HTTP client.
    pub http: HttpClientConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            refresh_timeout: Duration::from_secs(10),
            logout_delay: Duration::from_millis(100),
            http: HttpClientConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_logout_delay(mut self, delay: Duration) -> Self {
        self.logout_delay = delay;
        self
    }
}
