//! # API Errors
//!
//! Failures of the tracking endpoints, rendered as `{"Reason": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracking::TrackingError;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request could not be bound
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A store operation failed
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Tracking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ReasonResponse {
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ReasonResponse {
            reason: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        let store_err = StoreError::not_found("track-positions", "truck1");
        assert_eq!(
            ApiError::from(TrackingError::GetPosition(store_err)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_reason_body() {
        let body = serde_json::to_value(ReasonResponse {
            reason: "Failed adding record: boom".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"Reason": "Failed adding record: boom"}));
    }
}
