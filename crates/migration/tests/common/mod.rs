//! Shared fixtures for migration manager tests.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use migration::{Migration, MIGRATIONS_COLLECTION};
use store::{Bson, Document, DocumentStore, IndexSpec, MemoryStore, StoreError, UpdateOutcome};
use tokio::sync::Barrier;

pub fn boom(operation: &str) -> StoreError {
    StoreError::Query {
        collection: "test".to_owned(),
        message:    format!("{} failed", operation),
    }
}

/// A migration that counts its invocations and can be told to fail.
#[derive(Debug, Clone)]
pub struct CountingMigration {
    pub name:      String,
    pub ups:       Arc<AtomicUsize>,
    pub downs:     Arc<AtomicUsize>,
    pub fail_up:   Arc<AtomicBool>,
    pub fail_down: Arc<AtomicBool>,
    pub barrier:   Option<Arc<Barrier>>,
}

impl CountingMigration {
    pub fn new(name: &str) -> Self {
        Self {
            name:      name.to_owned(),
            ups:       Arc::default(),
            downs:     Arc::default(),
            fail_up:   Arc::default(),
            fail_down: Arc::default(),
            barrier:   None,
        }
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn ups(&self) -> usize { self.ups.load(Ordering::SeqCst) }

    pub fn downs(&self) -> usize { self.downs.load(Ordering::SeqCst) }

    pub fn boxed(&self) -> Box<dyn Migration> { Box::new(self.clone()) }
}

#[async_trait]
impl Migration for CountingMigration {
    fn name(&self) -> &str { &self.name }

    async fn up(&self, _store: &dyn DocumentStore) -> Result<(), StoreError> {
        self.ups.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail_up.load(Ordering::SeqCst) {
            return Err(boom("up"));
        }
        Ok(())
    }

    async fn down(&self, _store: &dyn DocumentStore) -> Result<(), StoreError> {
        self.downs.fetch_add(1, Ordering::SeqCst);
        if self.fail_down.load(Ordering::SeqCst) {
            return Err(boom("down"));
        }
        Ok(())
    }
}

/// Wraps a [`MemoryStore`] and injects failures on the tracking collection.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner:          MemoryStore,
    pub fail_insert:    AtomicBool,
    pub fail_delete:    AtomicBool,
    pub fail_reads:     AtomicBool,
    pub fail_index:     AtomicBool,
    pub insert_latency: Option<Duration>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new("flaky"),
            ..Default::default()
        }
    }

    fn check(flag: &AtomicBool, collection: &str, operation: &str) -> Result<(), StoreError> {
        if collection == MIGRATIONS_COLLECTION && flag.load(Ordering::SeqCst) {
            return Err(boom(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    fn database_name(&self) -> &str { self.inner.database_name() }

    async fn ping(&self) -> Result<(), StoreError> { self.inner.ping().await }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        Self::check(&self.fail_insert, collection, "insert")?;
        if let Some(latency) = self.insert_latency {
            tokio::time::sleep(latency).await;
        }
        self.inner.insert_one(collection, document).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        Self::check(&self.fail_reads, collection, "find_one")?;
        self.inner.find_one(collection, filter, sort).await
    }

    async fn find(&self, collection: &str, filter: Document, sort: Option<Document>) -> Result<Vec<Document>, StoreError> {
        Self::check(&self.fail_reads, collection, "find")?;
        self.inner.find(collection, filter, sort).await
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Self::check(&self.fail_reads, collection, "count")?;
        self.inner.count(collection, filter).await
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document) -> Result<UpdateOutcome, StoreError> {
        self.inner.update_one(collection, filter, update).await
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        self.inner.update_many(collection, filter, update).await
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Self::check(&self.fail_delete, collection, "delete")?;
        self.inner.delete_one(collection, filter).await
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError> {
        Self::check(&self.fail_index, collection, "create_index")?;
        self.inner.create_index(collection, index).await
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.inner.drop_collection(collection).await
    }
}
