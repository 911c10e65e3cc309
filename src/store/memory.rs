//! # In-Memory Backend
//!
//! Process-local store used for local development and tests. Can be
//! pre-populated from a JSON seed file of the form
//! `{"<collection name>": {"<document id>": {<fields>}}}`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::backend::{DocumentStore, DocumentStream};
use super::collection::Collection;
use super::errors::{StoreError, StoreResult};
use super::query::Query;
use super::value::{fields_from_json, Document, Fields};

type Tables = HashMap<Collection, BTreeMap<String, Fields>>;

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON seed file
    pub fn from_seed_file(path: &Path) -> StoreResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        Self::from_seed_json(&raw)
    }

    /// Load a store from seed JSON text
    pub fn from_seed_json(raw: &str) -> StoreResult<Self> {
        let seed: HashMap<String, Map<String, Value>> =
            serde_json::from_str(raw).map_err(|e| StoreError::Seed(e.to_string()))?;

        let store = Self::new();
        for (name, documents) in seed {
            let collection = Collection::from_name(&name)
                .ok_or_else(|| StoreError::Seed(format!("unknown collection: {}", name)))?;
            for (id, value) in documents {
                let Value::Object(fields) = value else {
                    return Err(StoreError::Seed(format!(
                        "document {}/{} is not an object",
                        name, id
                    )));
                };
                store.insert(collection, &id, fields_from_json(fields))?;
            }
        }
        Ok(store)
    }

    /// Put a document directly, replacing any existing one
    pub fn insert(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        self.write()?
            .entry(collection)
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.read()
            .map(|tables| tables.get(&collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".to_string()))
    }

    fn snapshot(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let tables = self.read()?;
        Ok(tables
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn into_stream(documents: Vec<Document>) -> DocumentStream {
    stream::iter(documents.into_iter().map(Ok)).boxed()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.insert(collection, &id, fields)?;
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        self.insert(collection, id, fields)
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Document> {
        let tables = self.read()?;
        tables
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone()))
            .ok_or_else(|| StoreError::not_found(collection.name(), id))
    }

    async fn documents(&self, collection: Collection) -> StoreResult<DocumentStream> {
        Ok(into_stream(self.snapshot(collection)?))
    }

    async fn query(&self, collection: Collection, query: Query) -> StoreResult<DocumentStream> {
        Ok(into_stream(query.apply(self.snapshot(collection)?)))
    }
}
