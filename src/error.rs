//! Error types for the item cache and product service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::cache::RecordId;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and the service around it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Product not found in the cache or the catalog
    #[error("Product not found: {0}")]
    NotFound(RecordId),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache used after shutdown
    #[error("Item cache has been shut down")]
    ShutDown,
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::ShutDown => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache and service.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (CacheError::NotFound(1), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::ShutDown, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CacheError::NotFound(42).to_string(), "Product not found: 42");
        assert_eq!(CacheError::ShutDown.to_string(), "Item cache has been shut down");
    }
}
