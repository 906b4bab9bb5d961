//! Product Catalog Core - Shared types library.
//!
//! This crate provides common types used across the catalog components:
//! - `storefront` - Server-rendered product catalog
//! - `integration-tests` - Black-box tests against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and feature flags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
