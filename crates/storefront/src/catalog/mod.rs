//! Product catalog: remote source, adapter, repository and query cache.
//!
//! # Architecture
//!
//! - The remote catalog is the source of truth - NO local persistence
//! - [`rest`] speaks the remote JSON API and adapts wire records into
//!   domain [`types`] at the boundary
//! - [`ProductsRepository`] is the seam handlers depend on
//! - [`ProductQuery`] sits in front of the repository with request
//!   coalescing, a staleness window, and post-delete cache updates (`moka`)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use product_catalog_storefront::catalog::{ProductQuery, RestProductsRepository};
//!
//! let repository = RestProductsRepository::new(&config.catalog)?;
//! let query = ProductQuery::new(Arc::new(repository), config.query.stale_time, config.query.strategy);
//!
//! let products = query.get_all().await?;
//! query.delete(&products[0].id).await?;
//! ```

mod cache;
pub mod query;
pub mod repository;
pub mod rest;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use query::{InvalidationStrategy, ProductQuery, QueryResult};
pub use repository::ProductsRepository;
pub use rest::RestProductsRepository;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP transport failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote catalog answered with a non-success status.
    #[error("Failed to {operation}: HTTP {status}")]
    Fetch {
        /// What the storefront was trying to do.
        operation: &'static str,
        /// Status returned by the remote catalog.
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected schema.
    #[error("Schema error: {0}")]
    Schema(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether the remote catalog reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}
