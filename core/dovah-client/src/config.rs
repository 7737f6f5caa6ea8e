//! Client configuration.

use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "DOVAH_API_URL";
/// Environment variable overriding the request timeout.
pub const TIMEOUT_ENV: &str = "DOVAH_TIMEOUT_SECS";

/// Connection settings for the library API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    /// (e.g. `http://localhost:5000/api`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 60,
            user_agent: concat!("dovah-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `DOVAH_API_URL` and `DOVAH_TIMEOUT_SECS`.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.base_url = url;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            config.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{TIMEOUT_ENV} is not a number: {raw}")))?;
        }
        Ok(config)
    }

    /// Parses the base URL, normalizing away a trailing slash.
    pub fn parsed_base_url(&self) -> ClientResult<Url> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        Url::parse(trimmed)
            .map_err(|e| ClientError::Config(format!("invalid base URL {trimmed}: {e}")))
    }
}
