//! REST client for the remote product catalog.
//!
//! Uses `reqwest` for HTTP. No caching and no retries here: callers go
//! through [`crate::catalog::ProductQuery`] for both.

pub mod conversions;
pub mod dto;

use std::sync::Arc;

use async_trait::async_trait;
use product_catalog_core::ProductId;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::{CatalogError, Product, ProductsRepository};
use crate::config::CatalogApiConfig;

use conversions::adapt;
use dto::ProductsPage;

// =============================================================================
// RestProductsRepository
// =============================================================================

/// Repository backed by the remote catalog's JSON API.
///
/// - `GET {base}?limit={page_size}` lists products
/// - `DELETE {base}/{id}` deletes one
#[derive(Clone)]
pub struct RestProductsRepository {
    inner: Arc<RestProductsRepositoryInner>,
}

struct RestProductsRepositoryInner {
    client: reqwest::Client,
    endpoint: Url,
    page_size: u32,
}

impl RestProductsRepository {
    /// Create a new repository client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            inner: Arc::new(RestProductsRepositoryInner {
                client,
                endpoint: config.base_url.clone(),
                page_size: config.page_size,
            }),
        })
    }

    /// URL of the listing request.
    fn list_url(&self) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.inner.page_size.to_string());
        url
    }

    /// URL of a single product.
    fn product_url(&self, id: &ProductId) -> Url {
        let mut url = self.inner.endpoint.clone();
        // Config only accepts http(s) URLs, which always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }
}

#[async_trait]
impl ProductsRepository for RestProductsRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.client.get(self.list_url()).send().await?;
        let status = response.status();

        // Read the body first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Fetch {
                operation: "fetch products",
                status,
            });
        }

        let products = decode_products(&body)?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        let response = self
            .inner
            .client
            .delete(self.product_url(id))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, "Catalog API rejected delete");
            return Err(CatalogError::Fetch {
                operation: "delete product",
                status,
            });
        }

        debug!("Deleted product");
        Ok(())
    }
}

/// Decode a listing body and adapt it to domain products.
///
/// # Errors
///
/// Returns `CatalogError::Schema` if the body does not match the schema.
pub fn decode_products(body: &str) -> Result<Vec<Product>, CatalogError> {
    let page: ProductsPage = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse catalog response"
        );
        CatalogError::Schema(e)
    })?;

    if let Some(total) = page.total
        && total > page.products.len() as u64
    {
        debug!(
            total,
            received = page.products.len(),
            "Catalog has more products than one page"
        );
    }

    Ok(adapt(page.products))
}
