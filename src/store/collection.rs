//! # Collections
//!
//! The fixed set of collections the service touches, mapped to the
//! names they carry in the store.

use std::fmt;

/// A known store collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Append-only log of every submitted record
    Records,
    /// Latest record per entity, keyed by entity name
    Positions,
    /// Externally managed entity documents
    Entities,
    /// Basic-auth users, keyed by username
    Users,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Records,
        Collection::Positions,
        Collection::Entities,
        Collection::Users,
    ];

    /// Store-side collection name
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Records => "track-records",
            Collection::Positions => "track-positions",
            Collection::Entities => "track-entities",
            Collection::Users => "users",
        }
    }

    /// Resolve a store-side name back to a collection
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
