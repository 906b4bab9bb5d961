//! Test doubles and fixtures for catalog code.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use product_catalog_core::{CurrencyCode, Price, ProductId};

use crate::catalog::{CatalogError, Product, ProductsRepository};

/// Product with the given stock and discount; other fields are filler.
pub fn product(id: &str, stock: i64, discount: f64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: format!("Description of product {id}"),
        category: "groceries".to_string(),
        price: Price::from_f64(9.99, CurrencyCode::USD).unwrap(),
        image: format!("https://cdn.example.com/{id}.png"),
        is_available: stock > 0,
        has_discounts: discount > 0.0,
        discount_percentage: discount,
        reviews: Vec::new(),
    }
}

/// In-memory repository that counts calls.
///
/// Reads copy the data before the simulated latency, so a read that overlaps
/// a delete returns the pre-delete collection like a slow remote would.
#[derive(Default)]
pub struct InMemoryRepository {
    products: Mutex<Vec<Product>>,
    get_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_deletes: AtomicBool,
    latency: Duration,
}

impl InMemoryRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductsRepository for InMemoryRepository {
    async fn get_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let products = self.products.lock().unwrap().clone();

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CatalogError::Fetch {
                operation: "fetch products",
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(products)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CatalogError::Fetch {
                operation: "delete product",
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }

        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(CatalogError::Fetch {
                operation: "delete product",
                status: reqwest::StatusCode::NOT_FOUND,
            });
        }
        Ok(())
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
