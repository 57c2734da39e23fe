//! # User Cache
//!
//! Key-value cache sitting in front of user reads. Redis in production, an
//! in-process map for tests and `memory://` development mode.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use error::{AppError, Result};
use redis::{aio::MultiplexedConnection, AsyncCommands, IntoConnectionInfo};
use tokio::{sync::RwLock, time::Instant};
use tracing::info;

/// URI scheme that selects the in-process cache.
pub const MEMORY_URI_SCHEME: &str = "memory://";

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis URL, or `memory://`
    pub url:    String,
    /// Redis logical database
    pub db:     i64,
    /// Lifetime of cached entries
    pub ttl:    Duration,
    /// Prefix prepended to user ids to form keys
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url:    "redis://127.0.0.1:6379".to_owned(),
            db:     0,
            ttl:    Duration::from_secs(600),
            prefix: "user:".to_owned(),
        }
    }
}

impl CacheConfig {
    /// Creates a new CacheConfig from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error if `ROSTER_REDIS_DB` or `ROSTER_CACHE_TTL` does not parse.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let db = match std::env::var("ROSTER_REDIS_DB") {
            Ok(value) => parse_env("ROSTER_REDIS_DB", &value)?,
            Err(_) => defaults.db,
        };
        let ttl = match std::env::var("ROSTER_CACHE_TTL") {
            Ok(value) => Duration::from_secs(parse_env("ROSTER_CACHE_TTL", &value)?),
            Err(_) => defaults.ttl,
        };

        Ok(Self {
            url: std::env::var("ROSTER_REDIS_URL").unwrap_or(defaults.url),
            db,
            ttl,
            prefix: std::env::var("ROSTER_CACHE_PREFIX").unwrap_or(defaults.prefix),
        })
    }

    /// Builder-style setter for the cache URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Whether this configuration selects the in-process cache.
    #[inline]
    pub fn is_memory(&self) -> bool { self.url.starts_with(MEMORY_URI_SCHEME) }

    /// Cache key for a user id.
    #[inline]
    pub fn key(&self, id: &str) -> String { format!("{}{}", self.prefix, id) }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("Invalid value for {}: {}", key, value)))
}

/// Cache operations used by the user service.
#[async_trait]
pub trait UserCache: Send + Sync + fmt::Debug {
    /// Fetch a value, `None` on miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a value. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check that the cache is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    connection: MultiplexedConnection,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_struct("RedisCache").finish_non_exhaustive() }
}

impl RedisCache {
    /// Open a multiplexed connection to the configured Redis database.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the URL is invalid or Redis is unreachable.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let mut info = config.url.as_str().into_connection_info()?;
        info.redis.db = config.db;

        let client = redis::Client::open(info)?;
        let connection = client.get_multiplexed_async_connection().await?;
        let cache = Self {
            connection,
        };
        cache.ping().await?;

        info!(target: "cache", db = config.db, "Connected to Redis");
        Ok(cache)
    }
}

#[async_trait]
impl UserCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// In-process cache with per-entry expiry
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    /// Whether no live entries remain.
    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl UserCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        let expired = match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => return Ok(Some(value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_owned(), (value.to_owned(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<()> { Ok(()) }
}

/// Open the cache selected by `config`.
///
/// # Errors
///
/// Returns a cache error if Redis cannot be reached.
pub async fn connect(config: &CacheConfig) -> Result<Arc<dyn UserCache>> {
    if config.is_memory() {
        info!(target: "cache", "Using in-process cache");
        return Ok(Arc::new(MemoryCache::new()));
    }
    Ok(Arc::new(RedisCache::connect(config).await?))
}
