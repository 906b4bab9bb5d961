//! Product catalog storefront - server-rendered product listing.
//!
//! This binary serves the catalog on port 3000 by default.
//!
//! # Architecture
//!
//! - Axum web framework with a small self-hosted script for in-place deletes
//! - Askama templates for server-side rendering
//! - Remote JSON catalog as the only source of product data
//! - In-process query cache (`moka`) with request coalescing and a
//!   staleness window
//! - Feature flags loaded once at startup

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use product_catalog_storefront::catalog::{ProductQuery, RestProductsRepository};
use product_catalog_storefront::config::StorefrontConfig;
use product_catalog_storefront::{flags, routes, state::AppState};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "product_catalog_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let repository =
        RestProductsRepository::new(&config.catalog).expect("Failed to create catalog client");

    // Flags come from the same place as the catalog, so share its timeout
    let flags_client = reqwest::Client::builder()
        .timeout(config.catalog.timeout)
        .build()
        .expect("Failed to create HTTP client");
    let flags = flags::load(&config.feature_flags, &flags_client)
        .await
        .expect("Failed to load feature flags");

    let products = ProductQuery::new(
        Arc::new(repository),
        config.query.stale_time,
        config.query.strategy,
    );
    tracing::info!(
        catalog = %config.catalog.base_url,
        stale_secs = config.query.stale_time.as_secs(),
        strategy = ?config.query.strategy,
        "Product catalog configured"
    );

    let state = AppState::builder()
        .products(products)
        .flags(flags)
        .build()
        .expect("Failed to initialize application state");

    let app = routes::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
