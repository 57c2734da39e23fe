//! # Migration Manager
//!
//! Applies registered migrations in order, records each one in the tracking
//! collection and reverts the most recent one on request.
//!
//! There is no in-process lock. The unique index on `name` installed by
//! [`MigrationManager::initialize`] is what keeps two concurrent runners from
//! recording the same migration twice.

use std::sync::Arc;

use bson::doc;
use logging::log_migration_event;
use store::{DocumentStore, IndexSpec, StoreError};
use tracing::{info, warn};

use crate::{Migration, MigrationError, MigrationRecord};

/// Collection holding one record per applied migration.
pub const MIGRATIONS_COLLECTION: &str = "_migrations";

/// What a call to [`MigrationManager::run`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Migrations whose `up` ran in this call
    pub applied: Vec<String>,
    /// Migrations that were already recorded
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MigrationManager {
    store:      Arc<dyn DocumentStore>,
    collection: String,
}

impl MigrationManager {
    /// Create a manager tracking migrations in `_migrations`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self::with_collection(store, MIGRATIONS_COLLECTION) }

    /// Create a manager tracking migrations in a custom collection.
    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Name of the tracking collection.
    pub fn collection(&self) -> &str { &self.collection }

    /// Ensure the unique index on `name` exists. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), MigrationError> {
        self.store
            .create_index(&self.collection, IndexSpec::new(doc! { "name": 1 }).unique())
            .await
            .map_err(|e| {
                tracing::error!(target: "migrate", error = %e, "Failed to create migration index");
                e
            })?;

        info!(target: "migrate", collection = %self.collection, "Migration manager initialized");
        Ok(())
    }

    /// Whether a record exists for `name`.
    pub async fn is_applied(&self, name: &str) -> Result<bool, MigrationError> {
        Ok(self
            .store
            .count(&self.collection, doc! { "name": name })
            .await? >
            0)
    }

    /// Apply every migration in `migrations` that has no record, in the given order.
    ///
    /// Stops at the first failing `up`. Migrations applied before it stay applied.
    pub async fn run(&self, migrations: &[Box<dyn Migration>]) -> Result<RunSummary, MigrationError> {
        info!(target: "migrate", total_migrations = migrations.len(), "Starting migration run");
        let mut summary = RunSummary::default();

        for migration in migrations {
            let name = migration.name();
            if self.is_applied(name).await? {
                info!(target: "migrate", name, "Migration already applied");
                summary.skipped.push(name.to_owned());
                continue;
            }

            info!(target: "migrate", name, "Running migration");
            if let Err(cause) = migration.up(self.store.as_ref()).await {
                tracing::error!(target: "migrate", name, error = %cause, "Migration failed");
                return Err(MigrationError::MigrationFailure {
                    name: name.to_owned(),
                    cause,
                });
            }

            match self.record(name).await {
                Ok(()) => log_migration_event!("applied", name),
                Err(cause) if cause.is_duplicate_key() => {
                    warn!(
                        target: "migrate",
                        name,
                        "Migration was recorded by a concurrent runner, treating as applied"
                    );
                },
                Err(cause) => {
                    return Err(MigrationError::RecordingFailure {
                        name: name.to_owned(),
                        cause,
                    });
                },
            }
            summary.applied.push(name.to_owned());
        }

        info!(
            target: "migrate",
            applied = summary.applied.len(),
            skipped = summary.skipped.len(),
            "All migrations completed successfully"
        );
        Ok(summary)
    }

    /// Revert the most recently applied migration.
    ///
    /// Returns the name of the reverted migration, or `None` when nothing is applied.
    pub async fn rollback(&self, migrations: &[Box<dyn Migration>]) -> Result<Option<String>, MigrationError> {
        let Some(last) = self.latest().await?
        else {
            info!(target: "migrate", "No migrations to rollback");
            return Ok(None);
        };

        let migration = migrations
            .iter()
            .find(|m| m.name() == last.name)
            .ok_or_else(|| {
                MigrationError::Configuration {
                    name: last.name.clone(),
                }
            })?;

        info!(target: "migrate", name = %last.name, "Rolling back migration");
        if let Err(cause) = migration.down(self.store.as_ref()).await {
            tracing::error!(target: "migrate", name = %last.name, error = %cause, "Rollback failed");
            return Err(MigrationError::RollbackFailure {
                name: last.name,
                cause,
            });
        }

        self.store
            .delete_one(&self.collection, doc! { "name": last.name.as_str() })
            .await?;
        log_migration_event!("rolled_back", last.name);
        Ok(Some(last.name))
    }

    /// All records, oldest first.
    pub async fn status(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let documents = self
            .store
            .find(
                &self.collection,
                doc! {},
                Some(doc! { "applied_at": 1, "sequence": 1 }),
            )
            .await?;

        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(|e| MigrationError::Store(e.into())))
            .collect()
    }

    /// Names of the migrations in `migrations` that have no record, in order.
    ///
    /// Changes nothing, so it serves as a dry run of [`run`](Self::run).
    pub async fn pending(&self, migrations: &[Box<dyn Migration>]) -> Result<Vec<String>, MigrationError> {
        let mut pending = Vec::new();
        for migration in migrations {
            if !self.is_applied(migration.name()).await? {
                pending.push(migration.name().to_owned());
            }
        }
        Ok(pending)
    }

    async fn latest(&self) -> Result<Option<MigrationRecord>, MigrationError> {
        let document = self
            .store
            .find_one(
                &self.collection,
                doc! {},
                Some(doc! { "applied_at": -1, "sequence": -1 }),
            )
            .await?;

        Ok(document
            .map(bson::from_document::<MigrationRecord>)
            .transpose()
            .map_err(StoreError::from)?)
    }

    async fn record(&self, name: &str) -> Result<(), StoreError> {
        let sequence = self
            .store
            .find_one(&self.collection, doc! {}, Some(doc! { "sequence": -1 }))
            .await?
            .and_then(|document| document.get_i64("sequence").ok())
            .unwrap_or(0) +
            1;

        let document = bson::to_document(&MigrationRecord::new(name, sequence))?;
        self.store.insert_one(&self.collection, document).await?;
        Ok(())
    }
}
