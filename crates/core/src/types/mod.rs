//! Core types for the product catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod flags;
pub mod id;
pub mod price;

pub use flags::FeatureFlags;
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
