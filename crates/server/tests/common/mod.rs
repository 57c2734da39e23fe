//! # Common Test Utilities
//!
//! Builds the application over in-process backends and drives it with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Once,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use error::{AppError, Result};
use http_body_util::BodyExt as _;
use migration::MigrationManager;
use server::{
    cache::{CacheConfig, MemoryCache, UserCache},
    create_app_router,
    AppState,
};
use store::{Bson, Document, DocumentStore, IndexSpec, MemoryStore, StoreError, UpdateOutcome};
use tower::ServiceExt as _;

static INIT: Once = Once::new();

/// Initialize test logging (run once per test binary)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A router over a migrated in-process store
pub struct TestApp {
    pub router: Router,
    pub store:  Arc<SwitchableStore>,
    pub cache:  Arc<MemoryCache>,
}

impl TestApp {
    pub async fn new() -> Self {
        init_test_env();
        let store = Arc::new(SwitchableStore::default());
        let manager = MigrationManager::new(store.clone());
        manager.initialize().await.unwrap();
        manager.run(&migration::migrations()).await.unwrap();

        let cache = Arc::new(MemoryCache::new());
        let state = AppState::new(store.clone(), cache.clone(), memory_cache_config());
        Self {
            router: create_app_router(state),
            store,
            cache,
        }
    }

    /// Send a request and decode the JSON body, `Null` when empty.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
        send(&self.router, request).await
    }

    /// Create a user through the API and return its id.
    pub async fn create_user(&self, name: &str, email: &str) -> String {
        let (status, _, body) = self
            .send(json_request(
                Method::POST,
                "/api/v1/users",
                serde_json::json!({ "name": name, "email": email }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_owned()
    }
}

pub fn memory_cache_config() -> CacheConfig {
    CacheConfig {
        ttl: Duration::from_secs(60),
        ..CacheConfig::default().with_url("memory://")
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    }
    else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_request(method: Method, uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A cache whose every operation fails
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl UserCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> { Err(AppError::cache("connection refused")) }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<()> { Err(AppError::cache("connection refused")) }

    async fn ping(&self) -> Result<()> { Err(AppError::cache("connection refused")) }
}

/// A [`MemoryStore`] that can be switched off, failing every call
#[derive(Debug, Default)]
pub struct SwitchableStore {
    pub inner: MemoryStore,
    pub down:  AtomicBool,
}

impl SwitchableStore {
    pub fn set_down(&self, down: bool) { self.down.store(down, Ordering::SeqCst); }

    fn check(&self) -> std::result::Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Connection {
                message: "server selection timeout".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SwitchableStore {
    fn database_name(&self) -> &str { self.inner.database_name() }

    async fn ping(&self) -> std::result::Result<(), StoreError> {
        self.check()?;
        self.inner.ping().await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> std::result::Result<Bson, StoreError> {
        self.check()?;
        self.inner.insert_one(collection, document).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> std::result::Result<Option<Document>, StoreError> {
        self.check()?;
        self.inner.find_one(collection, filter, sort).await
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> std::result::Result<Vec<Document>, StoreError> {
        self.check()?;
        self.inner.find(collection, filter, sort).await
    }

    async fn count(&self, collection: &str, filter: Document) -> std::result::Result<u64, StoreError> {
        self.check()?;
        self.inner.count(collection, filter).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> std::result::Result<UpdateOutcome, StoreError> {
        self.check()?;
        self.inner.update_one(collection, filter, update).await
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> std::result::Result<UpdateOutcome, StoreError> {
        self.check()?;
        self.inner.update_many(collection, filter, update).await
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> std::result::Result<u64, StoreError> {
        self.check()?;
        self.inner.delete_one(collection, filter).await
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> std::result::Result<(), StoreError> {
        self.check()?;
        self.inner.create_index(collection, index).await
    }

    async fn drop_collection(&self, collection: &str) -> std::result::Result<(), StoreError> {
        self.check()?;
        self.inner.drop_collection(collection).await
    }
}
