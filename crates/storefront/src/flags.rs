//! Feature flag loading.
//!
//! Flags are read once at startup from a local JSON file or an http(s) URL
//! and then carried in [`crate::state::AppState`]. A source that does not
//! exist yields the defaults (all off); any other failure stops startup.

use std::io::ErrorKind;
use std::path::PathBuf;

use product_catalog_core::FeatureFlags;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

/// Where the flags document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagSource {
    /// Local JSON file.
    File(PathBuf),
    /// Remote JSON document fetched with GET.
    Remote(Url),
}

/// Errors that can occur while loading flags.
#[derive(Debug, Error)]
pub enum FlagsError {
    #[error("Failed to read flags file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Flags request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Flags endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed flags document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FlagSource {
    /// Interpret `value` as a URL when it has an http(s) scheme, else as a path.
    ///
    /// # Errors
    ///
    /// Returns the URL error for an http(s) value that is not a valid URL.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Url::parse(value).map(Self::Remote)
        } else {
            Ok(Self::File(PathBuf::from(value)))
        }
    }
}

impl std::fmt::Display for FlagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Load the flags document from `source`.
///
/// # Errors
///
/// Returns `FlagsError` if the source exists but cannot be read or parsed.
#[instrument(skip(client), fields(source = %source))]
pub async fn load(source: &FlagSource, client: &reqwest::Client) -> Result<FeatureFlags, FlagsError> {
    let document = match source {
        FlagSource::File(path) => match tokio::fs::read_to_string(path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Flags file not found, using defaults");
                return Ok(FeatureFlags::default());
            }
            Err(source) => {
                return Err(FlagsError::Read {
                    path: path.clone(),
                    source,
                });
            }
        },
        FlagSource::Remote(url) => {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                warn!("Flags document not found, using defaults");
                return Ok(FeatureFlags::default());
            }
            if !status.is_success() {
                return Err(FlagsError::Status(status));
            }
            response.text().await?
        }
    };

    let flags = FeatureFlags::from_json(&document)?;
    info!(
        products_new_ui = flags.is_products_new_ui_enabled,
        "Feature flags loaded"
    );
    Ok(flags)
}
