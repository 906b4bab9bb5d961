//! Domain types for the product catalog.
//!
//! These types are what the rest of the storefront sees. They are built by
//! the adapter in [`super::rest::conversions`] and never mutated afterwards.

use chrono::{DateTime, Utc};
use product_catalog_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Discount above which a product is shown in the headline partition.
pub const DISCOUNT_THRESHOLD: f64 = 10.0;

// =============================================================================
// Product Types
// =============================================================================

/// A catalog product as rendered by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Remote catalog ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain-text description.
    pub description: String,
    /// Category slug (e.g., "beauty").
    pub category: String,
    /// Current selling price.
    pub price: Price,
    /// Thumbnail image URL.
    pub image: String,
    /// Derived from stock: `stock > 0`.
    pub is_available: bool,
    /// Derived from the discount: `discount_percentage > 0`.
    pub has_discounts: bool,
    /// Discount in percent (e.g., 12.5 for 12.5% off).
    pub discount_percentage: f64,
    /// Customer reviews, in the order the source returned them.
    pub reviews: Vec<Review>,
}

/// Where a product falls in the discount-based catalog layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountTier {
    /// Discounted by more than [`DISCOUNT_THRESHOLD`] percent.
    High,
    /// Discounted by a positive amount up to [`DISCOUNT_THRESHOLD`] percent.
    Low,
    /// Not discounted.
    None,
}

impl Product {
    /// Classify the product by its discount.
    #[must_use]
    pub fn discount_tier(&self) -> DiscountTier {
        if !self.has_discounts || self.discount_percentage <= 0.0 {
            DiscountTier::None
        } else if self.discount_percentage > DISCOUNT_THRESHOLD {
            DiscountTier::High
        } else {
            DiscountTier::Low
        }
    }

    /// Mean review rating, or `None` without reviews.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // review counts are tiny
        let count = self.reviews.len() as f64;
        Some(f64::from(total) / count)
    }
}

// =============================================================================
// Review Types
// =============================================================================

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating (1-5).
    pub rating: u8,
    /// Review text.
    pub comment: String,
    /// When the review was written.
    pub date: DateTime<Utc>,
    /// Who wrote it.
    pub reviewer: Reviewer,
}

/// Review author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub name: String,
    pub email: String,
}
