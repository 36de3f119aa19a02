//! HTTP error mapping for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finclue_core::alerts::AlertError;
use finclue_core::errors::{DatabaseError, Error};
use finclue_core::fx::FxError;
use finclue_market_data::MarketDataError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning core errors into HTTP responses.
///
/// Upstream outages (provider errors, missing exchange rate) map to 503 so
/// callers can distinguish "try again" from a bad request.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(Error::Unexpected(err.to_string()))
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Alert(AlertError::InvalidThreshold(_) | AlertError::InvalidReferenceHigh(_)) => {
            StatusCode::BAD_REQUEST
        }
        Error::MarketData(MarketDataError::InvalidSymbol(_)) => StatusCode::BAD_REQUEST,
        Error::MarketData(MarketDataError::ValidationFailed { .. }) => StatusCode::BAD_REQUEST,
        Error::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        Error::Alert(AlertError::EntryNotFound(_)) => StatusCode::NOT_FOUND,
        Error::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
        Error::Fx(FxError::RateUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        Error::MarketData(
            MarketDataError::RateLimited { .. }
            | MarketDataError::Timeout { .. }
            | MarketDataError::ProviderError { .. }
            | MarketDataError::Network(_),
        ) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Unhandled API error: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&Error::Database(DatabaseError::NotFound("x".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&Error::Fx(FxError::RateUnavailable {
                base: "USD".into(),
                quote: "EUR".into(),
                message: "down".into(),
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&Error::MarketData(MarketDataError::InvalidSymbol(
                "$$".into()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::Unexpected("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
