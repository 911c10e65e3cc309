//! # Tracking Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

/// A store operation behind a tracking request failed
#[derive(Debug, Clone, Error)]
pub enum TrackingError {
    #[error("Failed adding record: {0}")]
    AddRecord(#[source] StoreError),

    #[error("Failed setting position: {0}")]
    SetPosition(#[source] StoreError),

    #[error("Failed querying records: {0}")]
    QueryRecords(#[source] StoreError),

    #[error("Failed getting position: {0}")]
    GetPosition(#[source] StoreError),

    #[error("Failed listing entities: {0}")]
    ListEntities(#[source] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_text() {
        let err = TrackingError::AddRecord(StoreError::Transport("connection reset".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed adding record: transport error: connection reset"
        );
    }
}
