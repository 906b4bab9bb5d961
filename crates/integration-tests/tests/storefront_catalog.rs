//! End-to-end checks against a running storefront.
//!
//! Deletes go to the configured remote catalog; the default remote accepts
//! deletes without persisting them.

#![allow(clippy::unwrap_used)]

use product_catalog_core::ProductId;
use product_catalog_integration_tests::{client, storefront_url};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_storefront_health() {
    let client = client().unwrap();

    let live = client
        .get(format!("{}/health", storefront_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(live.status(), 200);
    assert_eq!(live.text().await.unwrap(), "ok");

    let ready = client
        .get(format!("{}/health/ready", storefront_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status(), 200);
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_listing_renders() {
    let response = client()
        .unwrap()
        .get(storefront_url())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let html = response.text().await.unwrap();
    assert!(html.contains("E-commerce Store"));
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_unknown_route_redirects_home() {
    let response = client()
        .unwrap()
        .get(format!("{}/no/such/page", storefront_url()))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/");
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_product_detail_and_delete() {
    let client = client().unwrap();
    let id = ProductId::new("1");
    let product_url = format!("{}/product/{id}", storefront_url());

    let detail = client.get(&product_url).send().await.unwrap();
    assert_eq!(detail.status(), 200);

    let deleted = client.delete(&product_url).send().await.unwrap();
    assert_eq!(deleted.status(), 200);

    let listing = client
        .get(storefront_url())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!listing.contains(&format!(r#"href="/product/{id}""#)));
}
