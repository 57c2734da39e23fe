//! # User Service
//!
//! Business operations on users. Reads by id go through the cache first;
//! writes invalidate the cached copy once the store has accepted them.
//! A misbehaving cache is logged and otherwise ignored.

use std::sync::Arc;

use entity::User;
use error::Result;
use logging::log_cache_operation;
use tracing::{info, warn};

use crate::{
    cache::{CacheConfig, UserCache},
    dto::users::{CreateUserRequest, UpdateUserRequest, UserResponse},
    repository::{UserChanges, UserRepository},
};

/// User operations with cache-aside reads
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    cache:      Arc<dyn UserCache>,
    config:     CacheConfig,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, cache: Arc<dyn UserCache>, config: CacheConfig) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    /// Create a user. Duplicate emails are a conflict.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserResponse> {
        let mut user = User::new(req.name, req.email);
        if let Some(phone_number) = req.phone_number {
            user.phone_number = phone_number;
        }

        let user = self.repository.create(user).await?;
        info!(target: "api", user_id = %user.id_hex(), "User created");
        Ok(user.into())
    }

    /// All users, oldest first. Never cached.
    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        Ok(self
            .repository
            .find_all()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    /// Fetch one user, serving from the cache when possible.
    pub async fn get_user(&self, id: &str) -> Result<UserResponse> {
        // Reject malformed ids before they reach the cache keyspace.
        store::parse_object_id(id)?;
        let key = self.config.key(id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                match serde_json::from_str::<UserResponse>(&cached) {
                    Ok(user) => {
                        log_cache_operation!("get", &key, true);
                        return Ok(user);
                    },
                    Err(e) => warn!(target: "cache", key = %key, error = %e, "Discarding unreadable cache entry"),
                }
            },
            Ok(None) => log_cache_operation!("get", &key, false),
            Err(e) => warn!(target: "cache", key = %key, error = %e, "Cache read failed"),
        }

        let user = UserResponse::from(self.repository.find_by_id(id).await?);
        self.fill(&key, &user).await;
        Ok(user)
    }

    /// Apply a partial update and drop the cached copy.
    pub async fn update_user(&self, id: &str, req: UpdateUserRequest) -> Result<UserResponse> {
        let changes = UserChanges {
            name:         req.name,
            email:        req.email,
            phone_number: req.phone_number,
            is_active:    req.is_active,
        };
        let user = self.repository.update(id, changes).await?;
        self.invalidate(id).await;
        Ok(user.into())
    }

    /// Delete a user and drop the cached copy.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;
        self.invalidate(id).await;
        info!(target: "api", user_id = %id, "User deleted");
        Ok(())
    }

    /// Whether the cache answers a ping.
    pub async fn cache_reachable(&self) -> bool {
        match self.cache.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "cache", error = %e, "Cache ping failed");
                false
            },
        }
    }

    async fn fill(&self, key: &str, user: &UserResponse) {
        let payload = match serde_json::to_string(user) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(target: "cache", key = %key, error = %e, "Failed to encode user for cache");
                return;
            },
        };
        match self.cache.set(key, &payload, self.config.ttl).await {
            Ok(()) => log_cache_operation!("set", key, false),
            Err(e) => warn!(target: "cache", key = %key, error = %e, "Cache write failed"),
        }
    }

    async fn invalidate(&self, id: &str) {
        let key = self.config.key(id);
        match self.cache.delete(&key).await {
            Ok(()) => log_cache_operation!("delete", &key, false),
            Err(e) => warn!(target: "cache", key = %key, error = %e, "Cache invalidation failed"),
        }
    }
}
