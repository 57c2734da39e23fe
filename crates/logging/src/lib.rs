//! # Roster Logging Infrastructure
//!
//! Structured logging utilities for the Roster service.
//! Provides tracing integration with JSON output and environment-based configuration.

pub mod config;
pub mod macros;
pub mod request_id;

pub use config::LoggingConfig;
pub use request_id::{RequestId, REQUEST_ID_HEADER};
// Re-export tracing so the exported macros resolve in downstream crates
pub use tracing;
pub use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Keeps the background log-file writer alive.
///
/// Dropping the guard flushes and stops the file writer, so hold it for the
/// lifetime of the process.
#[derive(Debug)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level or filter directive (debug, info, warn, error, `roster=debug`)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init_with_config(config: LoggingConfig) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, file_guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        log_file = ?config.log_file,
        "Logging initialized"
    );
    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
