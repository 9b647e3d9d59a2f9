//! Archive API client configuration.
//!
//! One base URL serves both the catalog listing and the access check.
//! Defaults point to a local storefront backend. Override via environment
//! variables or explicit construction for staging/testing.

use archive_core::{BearerToken, CategoryTag};
use url::Url;

/// Default catalog category browsed by the archive view.
pub const DEFAULT_CATEGORY: &str = "magazine";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the archive API.
///
/// `auth_token` is redacted by its own `Debug` implementation.
#[derive(Debug, Clone)]
pub struct ArchiveApiConfig {
    /// Base URL of the storefront backend.
    /// Default: <http://127.0.0.1:8080>
    pub base_url: Url,
    /// Category tag whose documents make up the archive.
    pub category: CategoryTag,
    /// Bearer credential of the visitor, if authenticated.
    pub auth_token: Option<BearerToken>,
    /// Request timeout in seconds. A stalled access check surfaces as a
    /// transport failure once this elapses.
    pub timeout_secs: u64,
}

impl ArchiveApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ARCHIVE_API_URL` (default: `http://127.0.0.1:8080`)
    /// - `ARCHIVE_CATEGORY` (default: `magazine`)
    /// - `ARCHIVE_AUTH_TOKEN` (optional; absent or blank means anonymous)
    /// - `ARCHIVE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let category = std::env::var("ARCHIVE_CATEGORY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(Self {
            base_url: env_url("ARCHIVE_API_URL", "http://127.0.0.1:8080")?,
            category: CategoryTag(category),
            auth_token: std::env::var("ARCHIVE_AUTH_TOKEN")
                .ok()
                .and_then(BearerToken::new),
            timeout_secs: std::env::var("ARCHIVE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("localhost", &format!("http://127.0.0.1:{port}"))?,
            category: CategoryTag(DEFAULT_CATEGORY.to_string()),
            auth_token: None,
            timeout_secs: 5,
        })
    }

    /// Parse and validate an explicit base URL (e.g. from a CLI flag).
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url("base_url", raw)?;
        Ok(self)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_base_url(var, &raw)
}

fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            name.to_string(),
            format!("{raw:?} cannot be used as a base URL"),
        ));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
