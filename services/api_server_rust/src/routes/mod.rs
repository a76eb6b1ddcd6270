//! HTTP route handlers.

pub mod market_price;
pub mod orders;
pub mod products;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health — liveness plus a database ping.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = garak_core::db::ping(&state.pool).await.is_ok();
    Json(json!({ "status": "ok", "database": database }))
}
