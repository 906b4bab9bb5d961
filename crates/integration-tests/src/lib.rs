//! Integration tests for the product catalog storefront.
//!
//! These tests drive a running storefront over HTTP, so they are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront
//! cargo run -p product-catalog-storefront
//!
//! # Run integration tests against it
//! STOREFRONT_URL=http://127.0.0.1:3000 cargo test -p product-catalog-integration-tests -- --ignored
//! ```

/// Environment variable holding the storefront base URL.
pub const STOREFRONT_URL_VAR: &str = "STOREFRONT_URL";

/// Base URL used when [`STOREFRONT_URL_VAR`] is unset.
pub const DEFAULT_STOREFRONT_URL: &str = "http://127.0.0.1:3000";

/// Base URL of the storefront under test, without a trailing slash.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var(STOREFRONT_URL_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STOREFRONT_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// HTTP client that does not follow redirects, so tests can assert on them.
///
/// # Errors
///
/// Returns the builder error if the TLS backend cannot be initialised.
pub fn client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
