//! Wire records for the remote catalog JSON API.
//!
//! These mirror the remote schema field for field. Validation happens here,
//! during deserialization: a record that decodes is safe to adapt.

use chrono::{DateTime, Utc};
use product_catalog_core::{CurrencyCode, Price, ProductId};
use serde::{Deserialize, Deserializer, de};

/// One page of the product listing (`GET /products?limit=N`).
#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<ProductRecord>,
    /// Total number of products on the remote side.
    #[serde(default)]
    pub total: Option<u64>,
}

/// A product as sent by the remote catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Price,
    pub thumbnail: String,
    pub stock: i64,
    #[serde(default)]
    pub discount_percentage: f64,
    pub reviews: Vec<ReviewRecord>,
}

/// A review as sent by the remote catalog, reviewer fields flattened.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

/// IDs arrive as JSON numbers from some catalogs and strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Text(s) if s.is_empty() => Err(de::Error::custom("product id is empty")),
        RawId::Text(s) => Ok(ProductId::new(s)),
        RawId::Number(n) => Ok(ProductId::new(n.to_string())),
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = f64::deserialize(deserializer)?;
    Price::from_f64(amount, CurrencyCode::USD).map_err(de::Error::custom)
}
