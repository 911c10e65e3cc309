//! # Auth Errors

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Basic authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header, or not the Basic scheme
    #[error("Unauthorized")]
    MissingCredentials,

    /// Basic payload is not valid base64
    #[error("Malformed credentials")]
    MalformedCredentials,

    /// Unknown user, wrong password, or the user lookup failed
    #[error("Unauthorized")]
    InvalidCredentials,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingCredentials | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    /// Response carrying the Basic challenge for `realm` where applicable
    pub fn into_challenge(self, realm: &str) -> Response {
        let mut response = self.clone().into_response();
        if self.status_code() == StatusCode::UNAUTHORIZED {
            let challenge = format!("basic realm=\"{}\"", realm.replace('"', "\\\""));
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MalformedCredentials.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_challenge_header() {
        let response = AuthError::InvalidCredentials.into_challenge("Restricted");
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "basic realm=\"Restricted\""
        );
    }

    #[test]
    fn test_bad_request_has_no_challenge() {
        let response = AuthError::MalformedCredentials.into_challenge("Restricted");
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
