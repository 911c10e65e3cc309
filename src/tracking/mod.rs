//! # Tracking
//!
//! Records and position snapshots for named entities.

pub mod errors;
pub mod model;
pub mod service;

pub use errors::{TrackingError, TrackingResult};
pub use model::{Position, Record};
pub use service::{TrackingService, RECORD_QUERY_LIMIT};
