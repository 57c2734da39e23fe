//! # MongoDB Store
//!
//! [`DocumentStore`] backed by the official MongoDB driver.

use std::time::Instant;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use logging::log_store_operation;
use mongodb::{
    error::{CommandError, ErrorKind, WriteError, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client,
    Collection,
    Database,
    IndexModel,
};

use crate::{DocumentStore, IndexSpec, StoreConfig, StoreError, UpdateOutcome};

const DUPLICATE_KEY: i32 = 11000;
const NAMESPACE_NOT_FOUND: i32 = 26;
const INDEX_ALREADY_EXISTS: i32 = 68;

/// MongoDB-backed document store
#[derive(Debug, Clone)]
pub struct MongoStore {
    client:   Client,
    database: Database,
}

impl MongoStore {
    /// Connect using `config` and verify the server answers a ping.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| connection_error(&e))?;
        options.app_name = Some("roster".to_owned());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        options.max_pool_size = Some(config.max_pool_size);

        let client = Client::with_options(options).map_err(|e| connection_error(&e))?;
        let store = Self {
            database: client.database(&config.database),
            client,
        };
        store.ping().await?;

        tracing::info!(
            target: "store",
            database = %config.database,
            max_pool_size = config.max_pool_size,
            "Connected to MongoDB"
        );
        Ok(store)
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client { &self.client }

    fn collection(&self, name: &str) -> Collection<Document> { self.database.collection(name) }
}

fn connection_error(err: &mongodb::error::Error) -> StoreError {
    StoreError::Connection {
        message: err.to_string(),
    }
}

fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code, ..
        })) => Some(*code),
        ErrorKind::Command(CommandError {
            code, ..
        }) => Some(*code),
        _ => None,
    }
}

/// Only an identical index may already exist. An index on the same keys or
/// name with other options (code 85) is reported, since it may lack the
/// uniqueness the caller asked for.
fn index_already_exists(code: Option<i32>) -> bool { code == Some(INDEX_ALREADY_EXISTS) }

/// Map a driver error onto the store taxonomy.
fn classify(collection: &str, err: mongodb::error::Error) -> StoreError {
    if server_code(&err) == Some(DUPLICATE_KEY) {
        return StoreError::duplicate_key(collection, err);
    }
    match err.kind.as_ref() {
        ErrorKind::ServerSelection {
            ..
        }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared {
            ..
        } => connection_error(&err),
        _ => StoreError::query(collection, err),
    }
}

fn elapsed_ms(start: Instant) -> f64 { start.elapsed().as_secs_f64() * 1000.0 }

#[async_trait]
impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str { self.database.name() }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| connection_error(&e))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        let start = Instant::now();
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("insert_one", collection, elapsed_ms(start));
        Ok(result.inserted_id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        let start = Instant::now();
        let coll = self.collection(collection);
        let mut action = coll.find_one(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }
        let document = action.await.map_err(|e| classify(collection, e))?;
        log_store_operation!("find_one", collection, elapsed_ms(start));
        Ok(document)
    }

    async fn find(&self, collection: &str, filter: Document, sort: Option<Document>) -> Result<Vec<Document>, StoreError> {
        let start = Instant::now();
        let coll = self.collection(collection);
        let mut action = coll.find(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }
        let documents = action
            .await
            .map_err(|e| classify(collection, e))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("find", collection, elapsed_ms(start));
        Ok(documents)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let start = Instant::now();
        let count = self
            .collection(collection)
            .count_documents(filter)
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("count", collection, elapsed_ms(start));
        Ok(count)
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document) -> Result<UpdateOutcome, StoreError> {
        let start = Instant::now();
        let result = self
            .collection(collection)
            .update_one(filter, update)
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("update_one", collection, elapsed_ms(start));
        Ok(UpdateOutcome {
            matched:  result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let start = Instant::now();
        let result = self
            .collection(collection)
            .update_many(filter, update)
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("update_many", collection, elapsed_ms(start));
        Ok(UpdateOutcome {
            matched:  result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let start = Instant::now();
        let result = self
            .collection(collection)
            .delete_one(filter)
            .await
            .map_err(|e| classify(collection, e))?;
        log_store_operation!("delete_one", collection, elapsed_ms(start));
        Ok(result.deleted_count)
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError> {
        let name = index.resolved_name();
        let model = IndexModel::builder()
            .keys(index.keys)
            .options(
                IndexOptions::builder()
                    .unique(index.unique)
                    .name(name.clone())
                    .build(),
            )
            .build();

        match self.collection(collection).create_index(model).await {
            Ok(_) => Ok(()),
            Err(e) if index_already_exists(server_code(&e)) => {
                tracing::warn!(target: "store", collection, index = %name, error = %e, "Index already exists");
                Ok(())
            },
            Err(e) => Err(classify(collection, e)),
        }
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        match self.collection(collection).drop().await {
            Ok(()) => Ok(()),
            Err(e) if server_code(&e) == Some(NAMESPACE_NOT_FOUND) => Ok(()),
            Err(e) => Err(classify(collection, e)),
        }
    }
}
