//! Application state shared across handlers.

use std::sync::Arc;

use product_catalog_core::FeatureFlags;
use thiserror::Error;

use crate::catalog::ProductQuery;

/// Error building application state.
#[derive(Debug, Error)]
pub enum StateError {
    /// A required dependency was never supplied to the builder.
    #[error("application state is missing {0}")]
    ConfigurationMissing(&'static str),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the product
/// query cache and the feature flags loaded at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: ProductQuery,
    flags: FeatureFlags,
}

impl AppState {
    /// Start building application state.
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    /// Get the product query cache.
    #[must_use]
    pub fn products(&self) -> &ProductQuery {
        &self.inner.products
    }

    /// Get the feature flags.
    #[must_use]
    pub fn flags(&self) -> FeatureFlags {
        self.inner.flags
    }
}

/// Builder for [`AppState`]; every dependency is required.
#[derive(Default)]
pub struct AppStateBuilder {
    products: Option<ProductQuery>,
    flags: Option<FeatureFlags>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn products(mut self, products: ProductQuery) -> Self {
        self.products = Some(products);
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Build the state.
    ///
    /// # Errors
    ///
    /// Returns `StateError::ConfigurationMissing` naming the first missing
    /// dependency.
    pub fn build(self) -> Result<AppState, StateError> {
        let flags = self
            .flags
            .ok_or(StateError::ConfigurationMissing("feature flags"))?;
        let products = self
            .products
            .ok_or(StateError::ConfigurationMissing("product query"))?;

        Ok(AppState {
            inner: Arc::new(AppStateInner { products, flags }),
        })
    }
}
