//! # Store Configuration
//!
//! Connection settings for the document store, read from environment variables.

use std::time::Duration;

use crate::StoreError;

/// URI scheme that selects the in-process store.
pub const MEMORY_URI_SCHEME: &str = "memory://";

/// Document store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection string, `mongodb://...` or `memory://`
    pub uri:             String,
    /// Database holding application and migration collections
    pub database:        String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Maximum number of pooled connections
    pub max_pool_size:   u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri:             "mongodb://localhost:27017".to_owned(),
            database:        "app_db".to_owned(),
            connect_timeout: Duration::from_secs(10),
            max_pool_size:   10,
        }
    }
}

impl StoreConfig {
    /// Creates a new StoreConfig from environment variables.
    ///
    /// Returns `Err` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, StoreError> {
        let defaults = Self::default();

        let connect_timeout = match std::env::var("ROSTER_MONGODB_CONNECT_TIMEOUT") {
            Ok(value) => Duration::from_secs(parse_env("ROSTER_MONGODB_CONNECT_TIMEOUT", &value)?),
            Err(_) => defaults.connect_timeout,
        };
        let max_pool_size = match std::env::var("ROSTER_MONGODB_POOL_SIZE") {
            Ok(value) => parse_env("ROSTER_MONGODB_POOL_SIZE", &value)?,
            Err(_) => defaults.max_pool_size,
        };

        Ok(Self {
            uri: std::env::var("ROSTER_MONGODB_URI").unwrap_or(defaults.uri),
            database: std::env::var("ROSTER_MONGODB_DATABASE").unwrap_or(defaults.database),
            connect_timeout,
            max_pool_size,
        })
    }

    /// Builder-style setter for the connection string.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Builder-style setter for the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Whether this configuration selects the in-process store.
    #[inline]
    pub fn is_memory(&self) -> bool { self.uri.starts_with(MEMORY_URI_SCHEME) }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value.trim().parse::<T>().map_err(|_| {
        StoreError::Configuration {
            key:   key.to_owned(),
            value: value.to_owned(),
        }
    })
}
