//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 3000)
//! - `CATALOG_API_BASE_URL` - Remote catalog products endpoint
//!   (default: <https://dummyjson.com/products>)
//! - `CATALOG_PAGE_SIZE` - Products requested per listing (default: 100)
//! - `CATALOG_HTTP_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `CATALOG_STALE_SECS` - How long a fetched catalog stays fresh (default: 60)
//! - `CATALOG_DELETE_STRATEGY` - `optimistic` or `invalidate` (default: optimistic)
//! - `CATALOG_FEATURE_FLAGS` - Flags file path or http(s) URL (default: config.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::catalog::InvalidationStrategy;
use crate::flags::FlagSource;

const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com/products";
const DEFAULT_FEATURE_FLAGS: &str = "config.json";

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
    /// Remote catalog API configuration
    pub catalog: CatalogApiConfig,
    /// Query cache configuration
    pub query: QueryConfig,
    /// Where the feature flags are read from
    pub feature_flags: FlagSource,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogApiConfig {
    /// Products endpoint; listing and per-product URLs derive from it
    pub base_url: Url,
    /// Value of the `limit` query parameter
    pub page_size: u32,
    /// Timeout for each outbound request
    pub timeout: Duration,
}

/// Query cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct QueryConfig {
    /// How long a fetched collection is served without refetching
    pub stale_time: Duration,
    /// How the cache reacts to a successful delete
    pub strategy: InvalidationStrategy,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("CATALOG_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = env.parse_or("CATALOG_PORT", "3000", str::parse::<u16>)?;

        let catalog = CatalogApiConfig {
            base_url: env.parse_or("CATALOG_API_BASE_URL", DEFAULT_API_BASE_URL, parse_http_url)?,
            page_size: env.parse_or("CATALOG_PAGE_SIZE", "100", parse_page_size)?,
            timeout: env.parse_or("CATALOG_HTTP_TIMEOUT_SECS", "10", parse_secs)?,
        };

        let query = QueryConfig {
            stale_time: env.parse_or("CATALOG_STALE_SECS", "60", parse_secs)?,
            strategy: env.parse_or(
                "CATALOG_DELETE_STRATEGY",
                "optimistic",
                str::parse::<InvalidationStrategy>,
            )?,
        };

        let feature_flags = env.parse_or(
            "CATALOG_FEATURE_FLAGS",
            DEFAULT_FEATURE_FLAGS,
            FlagSource::parse,
        )?;

        Ok(Self {
            host,
            port,
            catalog,
            query,
            feature_flags,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the same empty-means-unset rule everywhere.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T, E: std::fmt::Display>(
        &self,
        key: &str,
        default: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError> {
        let value = self.optional(key).unwrap_or_else(|| default.to_string());
        parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse an absolute http(s) URL.
fn parse_http_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}' (expected http or https)")),
    }
}

fn parse_page_size(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse a whole number of seconds; zero is rejected.
fn parse_secs(value: &str) -> Result<Duration, String> {
    match value.parse::<u64>() {
        Ok(0) => Err("must be at least 1 second".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(e.to_string()),
    }
}
