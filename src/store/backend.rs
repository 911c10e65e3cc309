//! # Document Store Trait

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::collection::Collection;
use super::errors::StoreResult;
use super::query::Query;
use super::value::{Document, Fields};

/// Lazily produced documents.
///
/// An `Err` item ends useful iteration; items already yielded stay valid.
pub type DocumentStream = BoxStream<'static, StoreResult<Document>>;

/// Operations the service needs from a document database
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Append a document under a generated id, returning the id
    async fn add(&self, collection: Collection, fields: Fields) -> StoreResult<String>;

    /// Create or fully overwrite the document with the given id
    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()>;

    /// Fetch one document; a missing document is `StoreError::NotFound`
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Document>;

    /// Every document in the collection, in no particular order
    async fn documents(&self, collection: Collection) -> StoreResult<DocumentStream>;

    /// Documents matching an ordered, limited query
    async fn query(&self, collection: Collection, query: Query) -> StoreResult<DocumentStream>;
}
