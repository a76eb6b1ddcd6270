//! Unified error type for the API surface.
//!
//! Handlers return `Result<_, ApiError>`; every variant renders as a JSON
//! `{"error": "..."}` body with the matching status code. Internal faults
//! log the underlying chain and surface a generic message plus the error's
//! description.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use garak_core::db::orders::OrderStoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(e) => {
                error!("Internal fault: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {}", e),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<OrderStoreError> for ApiError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::NotFound(id) => ApiError::NotFound(format!("order {} not found", id)),
            OrderStoreError::IllegalTransition { .. } => ApiError::Conflict(e.to_string()),
            OrderStoreError::CorruptStatus(_) | OrderStoreError::Db(_) => {
                ApiError::Internal(e.into())
            }
        }
    }
}
