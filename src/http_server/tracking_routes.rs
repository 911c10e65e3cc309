//! Tracking HTTP Routes
//!
//! Record ingestion and retrieval, position snapshots, and the entity
//! listing.

use std::sync::Arc;

use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequest, Path, Query, Request, State},
    http::header,
    routing::get,
    Form, Json, Router,
};

use crate::store::Fields;
use crate::tracking::{Position, TrackingService};

use super::errors::{ApiError, ApiResult};

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Tracking state shared across handlers
#[derive(Debug)]
pub struct TrackingState {
    pub service: TrackingService,
}

impl TrackingState {
    pub fn new(service: TrackingService) -> Self {
        Self { service }
    }
}

/// Create tracking routes
pub fn tracking_routes(state: Arc<TrackingState>) -> Router {
    Router::new()
        .route(
            "/record/:entity",
            get(get_records_handler).post(add_record_handler),
        )
        .route("/position/:entity", get(get_position_handler))
        .route("/entity", get(list_entities_handler))
        .with_state(state)
}

/// Position bound from the request.
///
/// A non-empty JSON or form body wins; anything else falls back to the
/// query string. Absent fields read as zero, non-finite values (including
/// floats beyond `f32` range) are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionInput(pub Position);

#[async_trait]
impl<S> FromRequest<S> for PositionInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();
        let media_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        let position = match media_type.as_str() {
            "application/json" if !bytes.is_empty() => {
                let Json(position) = Json::<Position>::from_bytes(&bytes)
                    .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
                position
            }
            "application/x-www-form-urlencoded" if !bytes.is_empty() => {
                let request = Request::from_parts(parts, Body::from(bytes));
                let Form(position) = Form::<Position>::from_request(request, state)
                    .await
                    .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
                position
            }
            _ => {
                let Query(position) = Query::<Position>::try_from_uri(&parts.uri)
                    .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
                position
            }
        };

        if !position.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "coordinates must be finite numbers, got longitude={} latitude={}",
                position.longitude, position.latitude
            )));
        }
        Ok(Self(position))
    }
}

// ==================
// Handlers
// ==================

async fn add_record_handler(
    State(state): State<Arc<TrackingState>>,
    Path(entity): Path<String>,
    PositionInput(position): PositionInput,
) -> ApiResult<Json<Position>> {
    let record = state.service.add_record(&entity, position).await?;
    Ok(Json(record.position))
}

async fn get_records_handler(
    State(state): State<Arc<TrackingState>>,
    Path(entity): Path<String>,
) -> ApiResult<Json<Vec<Fields>>> {
    Ok(Json(state.service.records(&entity).await?))
}

async fn get_position_handler(
    State(state): State<Arc<TrackingState>>,
    Path(entity): Path<String>,
) -> ApiResult<Json<Fields>> {
    Ok(Json(state.service.position(&entity).await?))
}

async fn list_entities_handler(
    State(state): State<Arc<TrackingState>>,
) -> ApiResult<Json<Vec<Fields>>> {
    Ok(Json(state.service.entities().await?))
}
