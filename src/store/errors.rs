//! # Document Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
///
/// The HTTP layer does not distinguish between these; every variant
/// surfaces as an internal error with its display text as the reason.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No document with this id in the collection
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// Request never reached the store or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Store answered with a non-success status
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Store payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Access token could not be obtained
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Seed file could not be loaded
    #[error("seed error: {0}")]
    Seed(String),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("track-positions", "truck1");
        assert_eq!(err.to_string(), "document track-positions/truck1 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_display() {
        let err = StoreError::Status {
            status: 403,
            message: "Missing or insufficient permissions.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store returned 403: Missing or insufficient permissions."
        );
        assert!(!err.is_not_found());
    }
}
