//! # Tracking Model
//!
//! Positions travel over HTTP with lowercase names; records are stored
//! with capitalized field names (`Entity`, `Position`, `Time`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{FieldValue, Fields};

pub const ENTITY_FIELD: &str = "Entity";
pub const POSITION_FIELD: &str = "Position";
pub const TIME_FIELD: &str = "Time";
pub const LONGITUDE_FIELD: &str = "Longitude";
pub const LATITUDE_FIELD: &str = "Latitude";

/// A coordinate pair. Absent fields read as zero; only non-finite values
/// are rejected at the HTTP edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub longitude: f32,
    pub latitude: f32,
}

impl Position {
    pub fn new(longitude: f32, latitude: f32) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Both coordinates are ordinary numbers (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            LONGITUDE_FIELD.to_string(),
            FieldValue::Double(self.longitude as f64),
        );
        fields.insert(
            LATITUDE_FIELD.to_string(),
            FieldValue::Double(self.latitude as f64),
        );
        fields
    }

    pub fn from_fields(fields: &Fields) -> Option<Self> {
        let coordinate = |name: &str| fields.get(name).and_then(FieldValue::as_f64);
        Some(Self {
            longitude: coordinate(LONGITUDE_FIELD)? as f32,
            latitude: coordinate(LATITUDE_FIELD)? as f32,
        })
    }
}

/// One timestamped observation of an entity's position
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: String,
    pub position: Position,
    pub time: DateTime<Utc>,
}

impl Record {
    /// Record stamped with the current time
    pub fn new(entity: impl Into<String>, position: Position) -> Self {
        Self::at(entity, position, Utc::now())
    }

    pub fn at(entity: impl Into<String>, position: Position, time: DateTime<Utc>) -> Self {
        Self {
            entity: entity.into(),
            position,
            time,
        }
    }

    /// Stored document shape, shared by the record log and the position snapshot
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(ENTITY_FIELD.to_string(), self.entity.clone().into());
        fields.insert(
            POSITION_FIELD.to_string(),
            FieldValue::Map(self.position.to_fields()),
        );
        fields.insert(TIME_FIELD.to_string(), self.time.into());
        fields
    }

    pub fn from_fields(fields: &Fields) -> Option<Self> {
        Some(Self {
            entity: fields.get(ENTITY_FIELD)?.as_str()?.to_string(),
            position: Position::from_fields(fields.get(POSITION_FIELD)?.as_map()?)?,
            time: fields.get(TIME_FIELD)?.as_timestamp()?,
        })
    }
}
