//! # Roster Document Store
//!
//! A narrow document-store interface shared by the migration manager and the
//! users repository, with a MongoDB backend and an in-process backend used by
//! tests and `memory://` development mode.

pub mod config;
pub mod error;
pub mod memory;
pub mod mongo;
mod ordering;

use std::sync::Arc;

use async_trait::async_trait;
pub use bson::{self, doc, oid::ObjectId, Bson, Document};
pub use config::StoreConfig;
pub use self::error::StoreError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Specification of an index on a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    /// Indexed fields with direction (`1` ascending, `-1` descending)
    pub keys:   Document,
    /// Whether the indexed values must be unique
    pub unique: bool,
    /// Explicit index name, defaults to the MongoDB naming scheme
    pub name:   Option<String>,
}

impl IndexSpec {
    /// A non-unique index over `keys`.
    pub fn new(keys: Document) -> Self {
        Self {
            keys,
            unique: false,
            name: None,
        }
    }

    /// Mark the index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Give the index an explicit name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name MongoDB would assign, e.g. `email_1` or `created_at_-1`.
    pub fn resolved_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.keys
                .iter()
                .map(|(field, direction)| format!("{}_{}", field, direction))
                .collect::<Vec<_>>()
                .join("_")
        })
    }
}

/// Counts reported by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched:  u64,
    pub modified: u64,
}

/// Operations the service needs from a document database.
///
/// Every operation addresses a named collection inside the database the
/// store was opened on. Filters and updates use MongoDB query syntax.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Name of the database this store is bound to.
    fn database_name(&self) -> &str;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a document, returning its `_id`.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError>;

    /// Find the first document matching `filter` in `sort` order.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Option<Document>, StoreError>;

    /// Find every document matching `filter` in `sort` order.
    async fn find(&self, collection: &str, filter: Document, sort: Option<Document>) -> Result<Vec<Document>, StoreError>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Apply `update` to the first document matching `filter`.
    async fn update_one(&self, collection: &str, filter: Document, update: Document) -> Result<UpdateOutcome, StoreError>;

    /// Apply `update` to every document matching `filter`.
    async fn update_many(&self, collection: &str, filter: Document, update: Document)
        -> Result<UpdateOutcome, StoreError>;

    /// Delete the first document matching `filter`, returning the number deleted.
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Create an index. Succeeds when an equivalent index already exists.
    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError>;

    /// Drop a collection and its indexes. Dropping a missing collection succeeds.
    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError>;
}

/// Open the store selected by `config`.
///
/// A `memory://` URI yields a fresh [`MemoryStore`]; anything else connects to
/// MongoDB and pings it.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    if config.is_memory() {
        tracing::info!(target: "store", database = %config.database, "Using in-process document store");
        return Ok(Arc::new(MemoryStore::new(config.database.clone())));
    }

    let store = MongoStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// Parse a hex string into an ObjectId.
pub fn parse_object_id(value: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(value).map_err(|_| {
        StoreError::InvalidId {
            value: value.to_owned(),
        }
    })
}
