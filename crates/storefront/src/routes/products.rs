//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use product_catalog_core::ProductId;
use tracing::instrument;

use crate::catalog::{DiscountTier, Product, Review};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone, Debug)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub href: String,
    pub delete_href: String,
    pub is_available: bool,
    /// e.g. "-12%"; `None` when not discounted.
    pub discount_label: Option<String>,
    /// Mean rating with one decimal.
    pub rating: Option<String>,
}

/// Review display data for templates.
#[derive(Clone, Debug)]
pub struct ReviewView {
    pub rating: u8,
    pub comment: String,
    pub reviewer: String,
    pub date: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let href = format!("/product/{}", product.id);
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            delete_href: format!("{href}/delete"),
            href,
            is_available: product.is_available,
            discount_label: (product.discount_tier() != DiscountTier::None)
                .then(|| discount_label(product.discount_percentage)),
            rating: product.average_rating().map(|r| format!("{r:.1}")),
        }
    }
}

/// Whole percent from 1% up; smaller discounts keep one decimal, at least 0.1%.
fn discount_label(percentage: f64) -> String {
    if percentage >= 1.0 {
        format!("-{percentage:.0}%")
    } else {
        format!("-{:.1}%", percentage.max(0.1))
    }
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment.clone(),
            reviewer: review.reviewer.name.clone(),
            date: review.date.format("%b %-d, %Y").to_string(),
        }
    }
}

/// The catalog split by discount tier, each in source order.
#[derive(Debug, Default)]
pub struct CatalogPartitions {
    /// Discount above 10%.
    pub high: Vec<ProductView>,
    /// Discount above 0% and at most 10%.
    pub low: Vec<ProductView>,
    /// Not discounted.
    pub undiscounted: Vec<ProductView>,
}

impl CatalogPartitions {
    /// Partition `products`; every product lands in exactly one tier.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut partitions = Self::default();
        for product in products {
            let tier = match product.discount_tier() {
                DiscountTier::High => &mut partitions.high,
                DiscountTier::Low => &mut partitions.low,
                DiscountTier::None => &mut partitions.undiscounted,
            };
            tier.push(ProductView::from(product));
        }
        partitions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty() && self.undiscounted.is_empty()
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    /// `None` when the catalog could not be loaded.
    pub partitions: Option<CatalogPartitions>,
}

/// Placeholder shown instead of the listing when the new UI flag is on.
#[derive(Template, WebTemplate)]
#[template(path = "products/new_ui.html")]
pub struct NewUiTemplate;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub reviews: Vec<ReviewView>,
}

/// Display the product listing.
///
/// A failed fetch renders the empty state rather than an error page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    if state.flags().is_products_new_ui_enabled {
        return NewUiTemplate.into_response();
    }

    let partitions = match state.products().get_all().await {
        Ok(products) => Some(CatalogPartitions::from_products(&products)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            None
        }
    };

    ProductsIndexTemplate { partitions }.into_response()
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Response> {
    let product = state
        .products()
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        reviews: product.reviews.iter().map(ReviewView::from).collect(),
    }
    .into_response())
}

/// Delete a product from the listing script.
///
/// Returns an empty body; the script removes the card itself.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    delete_product(&state, &id).await?;
    Ok(StatusCode::OK)
}

/// Delete a product from a plain form post and return to the listing.
#[instrument(skip(state))]
pub async fn destroy_form(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    delete_product(&state, &id).await?;
    Ok(Redirect::to("/"))
}

async fn delete_product(state: &AppState, id: &ProductId) -> Result<()> {
    state.products().delete(id).await?;
    add_breadcrumb("catalog", "Deleted product", Some(&[("product_id", id.as_str())]));
    Ok(())
}
