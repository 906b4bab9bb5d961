//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                     - Product listing (or new UI placeholder)
//! GET    /product/{id}         - Product detail
//! DELETE /product/{id}         - Delete product (script, empty body)
//! POST   /product/{id}/delete  - Delete product (form fallback, redirects to /)
//! GET    /health               - Liveness
//! GET    /health/ready         - Readiness (catalog reachable)
//! GET    /static/*             - Static assets
//! *                            - Redirect to /
//! ```

pub mod products;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Redirect,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show).delete(products::destroy))
        .route("/{id}/delete", post(products::destroy_form))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .nest("/product", product_routes())
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        // Unknown routes go back to the listing
        .fallback(|| async { Redirect::to("/") })
}

/// Build the full application: routes, middleware and state.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Reads the catalog through the query cache, so a fresh cached collection
/// answers without a remote call. Returns 503 if the catalog is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.products().get_all().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, header};
    use product_catalog_core::FeatureFlags;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::testing::{InMemoryRepository, product};
    use crate::catalog::{InvalidationStrategy, ProductQuery, query::DEFAULT_STALE_TIME};

    fn state(repo: &Arc<InMemoryRepository>, flags: FeatureFlags) -> AppState {
        AppState::builder()
            .flags(flags)
            .products(ProductQuery::new(
                Arc::clone(repo) as Arc<dyn crate::catalog::ProductsRepository>,
                DEFAULT_STALE_TIME,
                InvalidationStrategy::Optimistic,
            ))
            .build()
            .unwrap()
    }

    fn repo() -> Arc<InMemoryRepository> {
        Arc::new(InMemoryRepository::new(vec![
            product("1", 0, 15.0),
            product("2", 5, 5.0),
        ]))
    }

    async fn send(app: Router, method: Method, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_lists_products() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("content-security-policy"));
        let html = body(response).await;
        assert!(html.contains("Product 1"));
        assert!(html.contains("Product 2"));
    }

    #[tokio::test]
    async fn test_index_failure_renders_empty_state() {
        let repo = repo();
        repo.fail_reads(true);
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("No products available"));
    }

    #[tokio::test]
    async fn test_new_ui_flag_skips_catalog() {
        let repo = repo();
        let flags = FeatureFlags {
            is_products_new_ui_enabled: true,
        };
        let app = app(state(&repo, flags));

        let response = send(app, Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("new product experience"));
        assert_eq!(repo.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_show_product() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let found = send(app.clone(), Method::GET, "/product/2").await;
        let missing = send(app, Method::GET, "/product/99").await;

        assert_eq!(found.status(), StatusCode::OK);
        assert!(body(found).await.contains("Product 2"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_scripted_delete_then_listing_omits_product() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let deleted = send(app.clone(), Method::DELETE, "/product/1").await;
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(body(deleted).await.is_empty());

        let html = body(send(app, Method::GET, "/").await).await;
        assert!(!html.contains(r#"href="/product/1""#));
        assert!(html.contains(r#"href="/product/2""#));
    }

    #[tokio::test]
    async fn test_form_delete_redirects_home() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::POST, "/product/2/delete").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(repo.delete_calls(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_product_is_not_found() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::DELETE, "/product/99").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_delete_is_bad_gateway() {
        let repo = repo();
        repo.fail_deletes(true);
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::DELETE, "/product/1").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unknown_route_redirects_home() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::GET, "/does/not/exist").await;

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_delete_script_is_self_hosted() {
        let repo = repo();
        let app = app(state(&repo, FeatureFlags::default()));

        let response = send(app, Method::GET, "/static/js/catalog.js").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("method: \"DELETE\""));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let healthy = repo();
        let app = app(state(&healthy, FeatureFlags::default()));

        let live = send(app.clone(), Method::GET, "/health").await;
        assert_eq!(live.status(), StatusCode::OK);

        let ready = send(app, Method::GET, "/health/ready").await;
        assert_eq!(ready.status(), StatusCode::OK);

        let failing = repo();
        failing.fail_reads(true);
        let app = super::app(state(&failing, FeatureFlags::default()));
        let not_ready = send(app, Method::GET, "/health/ready").await;
        assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
