//! # Service Configuration
//!
//! Backing-service configuration for the CLI, read from environment variables.

use std::net::SocketAddr;

use error::Result;
use server::cache::CacheConfig;
use store::StoreConfig;

/// Everything the commands need to reach MongoDB and Redis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Document store settings (`ROSTER_MONGODB_*`)
    pub store:       StoreConfig,
    /// Cache settings (`ROSTER_REDIS_*`, `ROSTER_CACHE_*`)
    pub cache:       CacheConfig,
    /// Deployment environment (`ROSTER_ENV`)
    pub environment: String,
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error if any numeric setting does not parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            store:       StoreConfig::from_env()?,
            cache:       CacheConfig::from_env()?,
            environment: std::env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_owned()),
        })
    }
}

/// Parses a host and port into a SocketAddr.
///
/// # Arguments
///
/// * `host` - The host string to parse
/// * `port` - The port number
///
/// # Returns
///
/// A `Result` containing the parsed `SocketAddr` or an error if parsing fails.
pub fn parse_socket_addr(host: &str, port: u16) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 literals need brackets before a port is appended
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
