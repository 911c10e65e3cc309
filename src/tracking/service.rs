//! # Tracking Service
//!
//! The four tracking operations over a shared store handle.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, error, warn};

use crate::store::{
    Collection, Direction, Document, DocumentStore, DocumentStream, FieldValue, Fields, Query,
};

use super::errors::{TrackingError, TrackingResult};
use super::model::{Position, Record, ENTITY_FIELD, TIME_FIELD};

/// Most recent records fetched before filtering by entity
pub const RECORD_QUERY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct TrackingService {
    store: Arc<dyn DocumentStore>,
}

impl TrackingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append a record for `entity` and make it the entity's current position.
    ///
    /// The two writes are sequential and not atomic: if the snapshot write
    /// fails, the record stays appended.
    pub async fn add_record(&self, entity: &str, position: Position) -> TrackingResult<Record> {
        let record = Record::new(entity, position);
        let fields = record.to_fields();

        let id = self
            .store
            .add(Collection::Records, fields.clone())
            .await
            .map_err(|e| {
                error!(entity, error = %e, "failed adding record");
                TrackingError::AddRecord(e)
            })?;
        debug!(entity, id = %id, "record added");

        self.store
            .set(Collection::Positions, entity, fields)
            .await
            .map_err(|e| {
                error!(entity, record_id = %id, error = %e, "failed setting position");
                TrackingError::SetPosition(e)
            })?;

        Ok(record)
    }

    /// Recent records of `entity`, newest first.
    ///
    /// Only the newest [`RECORD_QUERY_LIMIT`] records across all entities are
    /// fetched and then filtered here, so a quiet entity can come back short.
    pub async fn records(&self, entity: &str) -> TrackingResult<Vec<Fields>> {
        let query = Query::new()
            .order_by(TIME_FIELD, Direction::Descending)
            .limit(RECORD_QUERY_LIMIT);
        let stream = self
            .store
            .query(Collection::Records, query)
            .await
            .map_err(|e| {
                error!(entity, error = %e, "failed querying records");
                TrackingError::QueryRecords(e)
            })?;

        Ok(collect_partial(Collection::Records, stream)
            .await
            .into_iter()
            .filter(|doc| doc.field(ENTITY_FIELD).and_then(FieldValue::as_str) == Some(entity))
            .map(|doc| doc.fields)
            .collect())
    }

    /// Latest stored record of `entity`, as stored
    pub async fn position(&self, entity: &str) -> TrackingResult<Fields> {
        self.store
            .get(Collection::Positions, entity)
            .await
            .map(|doc| doc.fields)
            .map_err(|e| {
                error!(entity, error = %e, "failed getting position");
                TrackingError::GetPosition(e)
            })
    }

    /// Every entity document, verbatim
    pub async fn entities(&self) -> TrackingResult<Vec<Fields>> {
        let stream = self
            .store
            .documents(Collection::Entities)
            .await
            .map_err(|e| {
                error!(error = %e, "failed listing entities");
                TrackingError::ListEntities(e)
            })?;

        Ok(collect_partial(Collection::Entities, stream)
            .await
            .into_iter()
            .map(|doc| doc.fields)
            .collect())
    }
}

/// Drain a document stream, stopping at the first error and keeping what
/// was read before it.
async fn collect_partial(collection: Collection, mut stream: DocumentStream) -> Vec<Document> {
    let mut documents = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!(
                    %collection,
                    error = %e,
                    returned = documents.len(),
                    "iteration failed, returning partial results"
                );
                break;
            }
        }
    }
    documents
}
