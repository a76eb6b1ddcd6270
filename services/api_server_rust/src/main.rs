//! Marketplace API server.
//!
//! Stateless request handling: each request is served independently off the
//! shared connection pool and the KAMIS client; the only cross-request state
//! is the pool itself.

mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use garak_core::clients::KamisClient;
use garak_core::config::AppConfig;
use garak_core::db;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url, &config.db_pool).await?;

    let state = Arc::new(AppState {
        pool,
        market_source: Arc::new(KamisClient::new(&config.kamis)),
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/market-price", get(routes::market_price::get_market_price))
        .route("/api/products/lowest", get(routes::products::get_lowest_prices))
        .route(
            "/api/products/{name}/prices",
            get(routes::products::get_product_prices),
        )
        .route("/api/listings", post(routes::products::create_listing))
        .route(
            "/api/orders",
            post(routes::orders::create_order).get(routes::orders::list_orders),
        )
        .route("/api/orders/{id}", get(routes::orders::get_order))
        .route(
            "/api/orders/{id}/status",
            patch(routes::orders::update_order_status),
        )
        .layer(cors)
        .with_state(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
