//! Firestore REST value encoding.
//!
//! Values travel as single-key objects such as `{"stringValue": "x"}` or
//! `{"mapValue": {"fields": {...}}}`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::store::errors::{StoreError, StoreResult};
use crate::store::value::{Document, FieldValue, Fields};

/// Document as returned by the REST API
#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    /// Document id is the last segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn into_document(self) -> StoreResult<Document> {
        let id = self.id().to_string();
        Ok(Document::new(id, decode_fields(&self.fields)?))
    }
}

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn decode_fields(fields: &Map<String, Value>) -> StoreResult<Fields> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

pub fn decode_value(value: &Value) -> StoreResult<FieldValue> {
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("expected value object, got {}", value)))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty value object".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| bad(kind, inner)),
        "integerValue" => {
            // int64 is sent as a decimal string, but accept bare numbers too
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed.map(FieldValue::Integer).ok_or_else(|| bad(kind, inner))
        }
        "doubleValue" => match inner {
            Value::Number(n) => n.as_f64().map(FieldValue::Double).ok_or_else(|| bad(kind, inner)),
            // NaN and infinities arrive as strings
            Value::String(s) => s
                .parse::<f64>()
                .map(FieldValue::Double)
                .map_err(|_| bad(kind, inner)),
            _ => Err(bad(kind, inner)),
        },
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
            .ok_or_else(|| bad(kind, inner)),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(|| bad(kind, inner)),
        "geoPointValue" => {
            let mut point = Fields::new();
            for key in ["latitude", "longitude"] {
                let coordinate = inner.get(key).and_then(Value::as_f64).unwrap_or_default();
                point.insert(key.to_string(), FieldValue::Double(coordinate));
            }
            Ok(FieldValue::Map(point))
        }
        "arrayValue" => match inner.get("values") {
            None => Ok(FieldValue::Array(Vec::new())),
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<StoreResult<Vec<_>>>()
                .map(FieldValue::Array),
            Some(_) => Err(bad(kind, inner)),
        },
        "mapValue" => match inner.get("fields") {
            None => Ok(FieldValue::Map(Fields::new())),
            Some(Value::Object(fields)) => decode_fields(fields).map(FieldValue::Map),
            Some(_) => Err(bad(kind, inner)),
        },
        other => Err(StoreError::Decode(format!("unsupported value type: {}", other))),
    }
}

fn bad(kind: &str, inner: &Value) -> StoreError {
    StoreError::Decode(format!("malformed {}: {}", kind, inner))
}
