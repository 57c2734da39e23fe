//! # CLI Validate Command
//!
//! Configuration validation for the Roster CLI.

use error::{AppError, Result};
use tracing::info;

use crate::config::AppConfig;

/// Validates the configuration and the reachability of MongoDB and Redis
///
/// # Returns
///
/// A `Result` indicating success or the first failing check.
pub async fn validate() -> Result<()> {
    info!(target: "validate", "Validating configuration...");
    let config = AppConfig::from_env()?;
    validate_config(&config).await
}

/// Check that both backing services answer a ping.
pub async fn validate_config(config: &AppConfig) -> Result<()> {
    let store = store::connect(&config.store)
        .await
        .map_err(|e| AppError::config(format!("Document store unreachable: {}", e)))?;
    store.ping().await?;
    info!(target: "validate", database = %store.database_name(), "Document store reachable");

    let cache = server::cache::connect(&config.cache)
        .await
        .map_err(|e| AppError::config(format!("Cache unreachable: {}", e.message())))?;
    cache.ping().await?;
    info!(target: "validate", "Cache reachable");

    info!(target: "validate", environment = %config.environment, "Configuration is valid");
    Ok(())
}
