//! Price-comparison endpoints.
//!
//! Read-only views over vendor listings: per-product offers with the
//! lowest-price flag, and the marketplace-wide lowest-price overview.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use garak_core::db::listings::{self, NewListing};
use garak_core::models::VendorListing;
use garak_core::pricing::{flag_lowest, lowest_price_summary, summarize_all};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/products/{name}/prices
///
/// All vendor offers for a standardized product, each flagged with whether
/// it carries the lowest current price. Zero matches is a valid empty page,
/// not an error.
pub async fn get_product_prices(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("product name must be non-empty"));
    }

    let rows = listings::fetch_by_standard_name(&state.pool, name)
        .await
        .map_err(ApiError::Internal)?;

    let summary = lowest_price_summary(&rows);
    let offers = flag_lowest(rows);
    let count = offers.len();

    Ok(Json(json!({
        "product": name,
        "offers": offers,
        "summary": summary,
        "count": count,
    })))
}

/// GET /api/products/lowest
///
/// Lowest price and vendor count per standardized product, sorted by name.
pub async fn get_lowest_prices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let rows = listings::fetch_all(&state.pool)
        .await
        .map_err(ApiError::Internal)?;

    let summaries = summarize_all(&rows);
    let count = summaries.len();

    Ok(Json(json!({ "products": summaries, "count": count })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub vendor_id: String,
    pub vendor_name: String,
    pub product_name: String,
    pub price: i64,
    pub unit: String,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// POST /api/listings
///
/// Vendor console: list a product. The standardized name is resolved
/// server-side; the response carries it so the vendor sees which comparison
/// group the offer joined.
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<VendorListing>), ApiError> {
    if req.product_name.trim().is_empty() {
        return Err(ApiError::bad_request("productName must be non-empty"));
    }
    if req.price < 0 {
        return Err(ApiError::bad_request("price must not be negative"));
    }
    if req.stock < 0 {
        return Err(ApiError::bad_request("stock must not be negative"));
    }
    if req.vendor_id.trim().is_empty() {
        return Err(ApiError::bad_request("vendorId must be non-empty"));
    }

    let listing = listings::insert_listing(
        &state.pool,
        NewListing {
            vendor_id: req.vendor_id,
            vendor_name: req.vendor_name,
            original_name: req.product_name,
            price: req.price,
            unit: req.unit,
            stock: req.stock,
            image_url: req.image_url,
        },
    )
    .await
    .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(listing)))
}
