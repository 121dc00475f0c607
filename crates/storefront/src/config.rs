//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_PATH` - Local key-value store file (default: data/store.json)
//! - `CATALOG_BASE_URL` - Product API root (default: <https://dummyjson.com>)
//! - `CATALOG_LIST_LIMIT` - Products requested for the browse listing (default: 150)
//! - `CATALOG_CACHE_TTL_SECS` - Product cache lifetime (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout for the product API (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `LOG_FORMAT` - `text` (default) or `json`

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// File backing the local key-value store
    pub data_path: PathBuf,
    /// Product API configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Emit logs as JSON lines instead of text
    pub log_json: bool,
}

/// Remote product API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root; `/products` is appended to it
    pub base_url: Url,
    /// `limit` passed when loading the full browse listing
    pub list_limit: u32,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_CATALOG_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default catalog URL is valid")),
            list_limit: 150,
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "STOREFRONT_PORT", 3000_u16)?;
        let data_path = lookup("STOREFRONT_DATA_PATH")
            .map_or_else(|| PathBuf::from("data/store.json"), PathBuf::from);

        let catalog = CatalogConfig::from_lookup(&lookup)?;

        let log_json = match non_empty(lookup("LOG_FORMAT")) {
            None => false,
            Some(format) => match format.trim().to_ascii_lowercase().as_str() {
                "text" => false,
                "json" => true,
                other => {
                    return Err(ConfigError::InvalidEnvVar(
                        "LOG_FORMAT".to_string(),
                        format!("expected 'text' or 'json', got '{other}'"),
                    ));
                }
            },
        };

        Ok(Self {
            host,
            port,
            data_path,
            catalog,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
            log_json,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = match lookup("CATALOG_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.base_url,
        };

        let list_limit = parse_or_default(lookup, "CATALOG_LIST_LIMIT", defaults.list_limit)?;
        if list_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_LIST_LIMIT".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cache_ttl = Duration::from_secs(parse_or_default(
            lookup,
            "CATALOG_CACHE_TTL_SECS",
            defaults.cache_ttl.as_secs(),
        )?);
        let timeout = Duration::from_secs(parse_or_default(
            lookup,
            "CATALOG_TIMEOUT_SECS",
            defaults.timeout.as_secs(),
        )?);

        Ok(Self {
            base_url,
            list_limit,
            cache_ttl,
            timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use the default.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse the catalog root, requiring http(s) and normalising the trailing slash.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Treat empty strings as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
