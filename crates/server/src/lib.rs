//! # Roster API Server
//!
//! Axum-based HTTP API for Roster user records.
//!
//! ## Modules
//!
//! - [`cache`]: Redis and in-process user caches
//! - [`dto`]: Request/response data transfer objects
//! - [`handlers`]: Endpoint bodies
//! - [`middleware`]: Request logging
//! - [`repository`]: User persistence over a document store
//! - [`router`]: API route configuration
//! - [`service`]: Cache-aside user operations

use std::{sync::Arc, time::Instant};

use store::DocumentStore;

pub mod cache;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod service;

pub use router::create_app_router;
pub use service::UserService;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Document store, used directly for health checks
    pub store:      Arc<dyn DocumentStore>,
    /// User operations
    pub users:      Arc<UserService>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Wire the user service over `store` and `cache`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn cache::UserCache>,
        cache_config: cache::CacheConfig,
    ) -> Self {
        let repository = Arc::new(repository::DocumentUserRepository::new(store.clone()));
        Self {
            store,
            users: Arc::new(UserService::new(repository, cache, cache_config)),
            start_time: Instant::now(),
        }
    }
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    /// Creates a new server result
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
