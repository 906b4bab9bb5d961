//! Repository seam between handlers and the remote catalog.

use async_trait::async_trait;
use product_catalog_core::ProductId;

use super::{CatalogError, Product};

/// Read and delete access to the product catalog.
///
/// Every call performs I/O; put a [`super::ProductQuery`] in front of it
/// to coalesce and cache reads.
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Fetch every product, adapted to domain records in source order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` on a non-success status,
    /// `CatalogError::Schema` on an undecodable body, and
    /// `CatalogError::Http` on transport failure.
    async fn get_all(&self) -> Result<Vec<Product>, CatalogError>;

    /// Delete one product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` on a non-success status and
    /// `CatalogError::Http` on transport failure.
    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError>;
}
