//! Builder for the underlying `reqwest` client.

use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("portfolio-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for the HTTP client shared by every request a `RequestClient` makes.
///
/// Request deadlines are applied per call by the request client, and failed
/// calls are never retried at this layer: a timeout or network failure is
/// surfaced to the caller as-is.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .user_agent(self.config.user_agent)
            .build()
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = HttpClientBuilder::new();
        assert_eq!(builder.config.connect_timeout, Duration::from_secs(10));
        assert!(builder.config.user_agent.starts_with("portfolio-auth/"));
    }

    #[test]
    fn test_builder_overrides() {
        let builder = HttpClientBuilder::new()
            .with_connect_timeout(Duration::from_secs(2))
            .with_user_agent("cli/1.0".to_string());
        assert_eq!(builder.config.connect_timeout, Duration::from_secs(2));
        assert_eq!(builder.config.user_agent, "cli/1.0");
    }

    #[tokio::test]
    async fn test_build_client() {
        assert!(HttpClientBuilder::new().build().is_ok());
    }
}
