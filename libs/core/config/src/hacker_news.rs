use crate::{env_or_default, ConfigError, FromEnv};
use std::time::Duration;

/// Public Firebase endpoint of the Hacker News API
pub const DEFAULT_HN_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Upstream API settings for the Hacker News client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HackerNewsConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl HackerNewsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl FromEnv for HackerNewsConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HN_API_BASE_URL: defaults to the public Firebase endpoint
    /// - HN_REQUEST_TIMEOUT_SECS: defaults to 30
    /// - HN_USER_AGENT: defaults to "hn-mcp/<version>"
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = env_or_default("HN_API_BASE_URL", &defaults.base_url);
        if base_url.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "HN_API_BASE_URL".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        let timeout_secs: u64 = env_or_default(
            "HN_REQUEST_TIMEOUT_SECS",
            &defaults.request_timeout.as_secs().to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "HN_REQUEST_TIMEOUT_SECS".to_string(),
            details: format!("{}", e),
        })?;

        let user_agent = env_or_default("HN_USER_AGENT", &defaults.user_agent);

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HN_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("hn-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
