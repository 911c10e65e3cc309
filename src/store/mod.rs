//! # Document Store
//!
//! Typed access to the external document database: the known
//! collections, a store-neutral field model, and the backends.

pub mod backend;
pub mod collection;
pub mod errors;
pub mod firestore;
pub mod memory;
pub mod query;
pub mod value;

pub use backend::{DocumentStore, DocumentStream};
pub use collection::Collection;
pub use errors::{StoreError, StoreResult};
pub use firestore::credentials::TokenSource;
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use query::{Direction, Query};
pub use value::{Document, FieldValue, Fields};
