//! # Roster Migrations
//!
//! Named, ordered transformations of the document store, applied at most once
//! each and tracked in the `_migrations` collection.
//!
//! ```rust,ignore
//! let manager = MigrationManager::new(store);
//! manager.initialize().await?;
//! manager.run(&migration::migrations()).await?;
//! ```

pub mod error;
pub mod manager;
pub mod migrator;
pub mod migrators;
pub mod record;

use async_trait::async_trait;
pub use self::error::MigrationError;
pub use manager::{MigrationManager, RunSummary, MIGRATIONS_COLLECTION};
pub use migrator::migrations;
pub use record::MigrationRecord;
use store::{DocumentStore, StoreError};

/// One forward transformation of the store and its inverse.
///
/// Implementations are stateless and idempotent. They touch application
/// collections only, never the tracking collection.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique, lexically ordered identifier.
    fn name(&self) -> &str;

    /// Apply the transformation.
    async fn up(&self, store: &dyn DocumentStore) -> Result<(), StoreError>;

    /// Revert the transformation.
    async fn down(&self, store: &dyn DocumentStore) -> Result<(), StoreError>;
}
