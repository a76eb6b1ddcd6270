//! Market-price lookup endpoint.
//!
//! Proxies the KAMIS lookup. Contract: missing/empty `productName` is the
//! only client error; upstream unavailability (timeout, network failure,
//! zero rows) is a valid empty response; only an unexpected internal fault
//! produces a 500, with the report fields zeroed so the body shape never
//! changes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use garak_core::models::MarketPriceReport;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPriceParams {
    pub product_name: Option<String>,
    pub region: Option<String>,
}

/// GET /api/market-price?productName=사과&region=서울
pub async fn get_market_price(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MarketPriceParams>,
) -> Response {
    let product = match params
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        Some(p) => p.to_string(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "productName query parameter is required" })),
            )
                .into_response();
        }
    };

    match lookup(&state, &product, params.region.as_deref()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("market-price lookup fault for '{}': {:#}", product, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Internal server error: {}", e),
                    "prices": [],
                    "averagePrice": 0,
                    "count": 0,
                })),
            )
                .into_response()
        }
    }
}

/// The fallible part, separated so the handler above owns the HTTP contract.
/// `market_report` itself absorbs upstream failures, so this only fails on
/// faults inside the process.
async fn lookup(
    state: &AppState,
    product: &str,
    region: Option<&str>,
) -> anyhow::Result<MarketPriceReport> {
    Ok(state.market_source.market_report(product, region).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use garak_core::clients::MarketPriceSource;
    use garak_core::models::MarketPrice;
    use sqlx::postgres::PgPoolOptions;

    /// Stub upstream: returns a canned set of quotes, or nothing.
    struct StubSource {
        prices: Vec<MarketPrice>,
    }

    #[async_trait]
    impl MarketPriceSource for StubSource {
        async fn market_report(&self, _product: &str, _region: Option<&str>) -> MarketPriceReport {
            MarketPriceReport::from_prices(self.prices.clone())
        }
    }

    fn make_state(prices: Vec<MarketPrice>) -> Arc<AppState> {
        // connect_lazy never touches the network; handlers under test here
        // don't query the pool
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/garak_test")
            .unwrap();
        Arc::new(AppState {
            pool,
            market_source: Arc::new(StubSource { prices }),
        })
    }

    fn quote(price: f64) -> MarketPrice {
        MarketPrice {
            market_name: "가락".to_string(),
            product_name: "apple".to_string(),
            price,
            grade: "상품".to_string(),
            unit: "10kg".to_string(),
            date: "11/14".to_string(),
            region: None,
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_product_name_is_400() {
        let state = make_state(vec![quote(1000.0)]);
        let params = MarketPriceParams {
            product_name: None,
            region: Some("서울".to_string()),
        };

        let resp = get_market_price(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("productName"));
    }

    #[tokio::test]
    async fn test_empty_product_name_is_400() {
        let state = make_state(vec![]);
        let params = MarketPriceParams {
            product_name: Some("   ".to_string()),
            region: None,
        };

        let resp = get_market_price(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_average_is_arithmetic_mean() {
        let state = make_state(vec![quote(1000.0), quote(1200.0), quote(1100.0)]);
        let params = MarketPriceParams {
            product_name: Some("apple".to_string()),
            region: None,
        };

        let resp = get_market_price(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["averagePrice"], 1100.0);
        assert_eq!(body["count"], 3);
        assert_eq!(body["prices"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_results_is_valid_200() {
        // An upstream timeout produces exactly this report, so this also
        // covers the "timeout looks like zero results" property
        let state = make_state(vec![]);
        let params = MarketPriceParams {
            product_name: Some("apple".to_string()),
            region: None,
        };

        let resp = get_market_price(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["prices"].as_array().unwrap().len(), 0);
        assert_eq!(body["averagePrice"], 0.0);
        assert_eq!(body["count"], 0);
    }
}
