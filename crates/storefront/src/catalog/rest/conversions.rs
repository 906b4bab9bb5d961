//! Wire record to domain type conversions.
//!
//! Pure and total: every decoded record maps to exactly one product, in the
//! order received.

use crate::catalog::types::{Product, Review, Reviewer};

use super::dto::{ProductRecord, ReviewRecord};

/// Adapt a page of wire records into domain products.
#[must_use]
pub fn adapt(records: Vec<ProductRecord>) -> Vec<Product> {
    records.into_iter().map(convert_product).collect()
}

/// Convert a single wire record.
#[must_use]
pub fn convert_product(record: ProductRecord) -> Product {
    Product {
        id: record.id,
        name: record.title,
        description: record.description,
        category: record.category,
        price: record.price,
        image: record.thumbnail,
        is_available: record.stock > 0,
        has_discounts: record.discount_percentage > 0.0,
        discount_percentage: record.discount_percentage,
        reviews: record.reviews.into_iter().map(convert_review).collect(),
    }
}

fn convert_review(record: ReviewRecord) -> Review {
    Review {
        rating: record.rating,
        comment: record.comment,
        date: record.date,
        reviewer: Reviewer {
            name: record.reviewer_name,
            email: record.reviewer_email,
        },
    }
}
