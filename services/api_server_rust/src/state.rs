use std::sync::Arc;

use sqlx::PgPool;

use garak_core::clients::MarketPriceSource;

/// Shared handler state. The market-price source is a trait object so tests
/// can run the handlers against a stub upstream.
pub struct AppState {
    pub pool: PgPool,
    pub market_source: Arc<dyn MarketPriceSource>,
}
