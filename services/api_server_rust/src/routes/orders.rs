//! Order endpoints.
//!
//! Checkout creates a pending order; vendors and retailers then move it
//! through the legal status transitions. Orders are never deleted.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use garak_core::db::orders::{self, NewOrder};
use garak_core::models::{Order, OrderStatus};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    pub retailer_id: String,
    pub vendor_id: String,
    pub quantity: i32,
    pub total_price: i64,
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    if req.quantity <= 0 {
        return Err(ApiError::bad_request("quantity must be positive"));
    }
    if req.total_price < 0 {
        return Err(ApiError::bad_request("totalPrice must not be negative"));
    }
    if req.retailer_id.trim().is_empty() || req.vendor_id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "retailerId and vendorId must be non-empty",
        ));
    }

    let order = orders::insert_order(
        &state.pool,
        NewOrder {
            product_id: req.product_id,
            retailer_id: req.retailer_id,
            vendor_id: req.vendor_id,
            quantity: req.quantity,
            total_price: req.total_price,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = orders::fetch_order(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("order {} not found", id)))?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
    pub retailer_id: Option<String>,
}

/// GET /api/orders?retailerId=...
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<Value>, ApiError> {
    let retailer_id = params
        .retailer_id
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::bad_request("retailerId query parameter is required"))?;

    let rows = orders::fetch_orders_for_retailer(&state.pool, retailer_id).await?;
    let count = rows.len();

    Ok(Json(json!({ "orders": rows, "count": count })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /api/orders/{id}/status
///
/// 400 for an unknown status value, 404 for an unknown order, 409 for a
/// transition outside the legal set.
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let next = OrderStatus::parse(&req.status)
        .ok_or_else(|| ApiError::bad_request(format!("unknown status '{}'", req.status)))?;

    let order = orders::update_status(&state.pool, id, next).await?;
    Ok(Json(order))
}
