//! HTTP error mapping for the API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use foliotrack_core::errors::{DatabaseError, Error as CoreError};
use foliotrack_market_data::MarketDataError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error type returned by every handler; maps domain errors to HTTP
/// status codes and a `{"error": ...}` JSON body.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Unauthorized(String),
    Forbidden(String),
    TooManyRequests,
    NotConfigured,
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::MarketData(MarketDataError::SymbolNotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::MarketData(MarketDataError::RateLimited { .. }) => {
            StatusCode::TOO_MANY_REQUESTS
        }
        CoreError::MarketData(_) | CoreError::CurrencyConversionFailed(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Core(err) => {
                let status = core_status(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal error: {}", err);
                    (status, "Internal server error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string())
            }
            ApiError::NotConfigured => (
                StatusCode::NOT_FOUND,
                "Authentication is not configured for this server".to_string(),
            ),
            ApiError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
