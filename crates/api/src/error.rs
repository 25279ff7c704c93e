//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory::InventoryError;
use ledger::LedgerError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Inventory core rejection.
    Inventory(InventoryError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Inventory(err) => inventory_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn inventory_error_to_response(err: InventoryError) -> (StatusCode, String) {
    match &err {
        InventoryError::UnknownItem { .. } | InventoryError::UnknownReservation { .. } => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        InventoryError::InvalidQuantity { .. }
        | InventoryError::QuantityPrecision { .. }
        | InventoryError::NegativePrice { .. }
        | InventoryError::NegativeMinLevel { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        // State-dependent rejections: the client's view is stale, a refresh
        // and retry is the right move.
        InventoryError::InsufficientStock { .. }
        | InventoryError::InsufficientAvailability { .. }
        | InventoryError::InvalidTransition { .. }
        | InventoryError::ItemRetired { .. }
        | InventoryError::DuplicatePartNumber { .. } => (StatusCode::CONFLICT, err.to_string()),
        InventoryError::Ledger(ledger_err) => match ledger_err {
            LedgerError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
            LedgerError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
            LedgerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        },
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Inventory(err)
    }
}
