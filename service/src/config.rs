use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use portfolio_auth::request::DEFAULT_BASE_URL;
use portfolio_auth::ClientConfig;
use std::path::Path;
use std::time::Duration;

/// `--token-store` value that keeps the session in memory only.
pub const MEMORY_TOKEN_STORE: &str = "memory";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the portfolio backend API
    #[arg(long, env = "API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Timeout in seconds for a single request, including reading its body
    #[arg(long, env, default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// Timeout in seconds for renewing the access token
    #[arg(long, env, default_value_t = 10)]
    pub refresh_timeout_secs: u64,

    /// Delay in milliseconds before the logout signal is delivered
    #[arg(long, env, default_value_t = 100)]
    pub logout_delay_ms: u64,

    /// Where the session is kept: a JSON file path, or "memory" for no persistence
    #[arg(long, env, default_value = ".portfolio_session.json")]
    token_store: String,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Path of the session file, or `None` when the session lives in memory.
    pub fn token_store_path(&self) -> Option<&Path> {
        if self.token_store.eq_ignore_ascii_case(MEMORY_TOKEN_STORE) {
            None
        } else {
            Some(Path::new(&self.token_store))
        }
    }

    pub fn set_token_store(mut self, token_store: impl Into<String>) -> Self {
        self.token_store = token_store.into();
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_refresh_timeout(Duration::from_secs(self.refresh_timeout_secs))
            .with_logout_delay(Duration::from_millis(self.logout_delay_ms))
    }
}
