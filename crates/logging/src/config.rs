//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{self, time::UtcTime, MakeWriter},
    prelude::*,
    Layer,
    Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path, written as hourly-rolled JSON
    #[serde(default)]
    pub log_file: Option<String>,

    /// Whether to include timestamps
    #[serde(default = "default::bool_true")]
    pub include_timestamp: bool,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

mod default {
    pub fn bool_true() -> bool { true }
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "json".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:             default_level(),
            format:            default_format(),
            log_file:          None,
            include_timestamp: true,
            environment:       default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// `RUST_LOG`, `ROSTER_LOG_FORMAT`, `ROSTER_LOG_FILE` and `ROSTER_ENV`
    /// take precedence over the supplied values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level: std::env::var("RUST_LOG")
                .ok()
                .unwrap_or_else(|| level.to_string()),
            format: std::env::var("ROSTER_LOG_FORMAT")
                .ok()
                .unwrap_or_else(|| format.to_string()),
            log_file: std::env::var("ROSTER_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("ROSTER_ENV").unwrap_or_else(|_| default_environment()),
            ..Default::default()
        }
    }

    /// The filter derived from `level`, falling back to `info` when it does not parse.
    pub fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// The returned guard must be kept alive while a log file is in use.
    pub fn build(&self) -> (Box<dyn tracing::Subscriber + Send + Sync>, Option<WorkerGuard>) {
        let mut layers: Vec<BoxedLayer> = vec![self.format_layer(std::io::stdout)];

        let file_guard = self.log_file.as_ref().map(|log_file| {
            let path = Path::new(log_file);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "roster.log".to_string());

            let appender = tracing_appender::rolling::hourly(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(non_blocking)
                    .boxed(),
            );
            guard
        });

        let subscriber = Registry::default().with(layers).with(self.filter());
        (Box::new(subscriber), file_guard)
    }

    /// Build the console layer for the configured format.
    fn format_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer().with_writer(writer).with_target(true);
        match (self.format.as_str(), self.include_timestamp) {
            ("pretty", true) => layer.pretty().with_timer(UtcTime::rfc_3339()).boxed(),
            ("pretty", false) => layer.pretty().without_time().boxed(),
            ("compact", true) => layer.compact().with_timer(UtcTime::rfc_3339()).boxed(),
            ("compact", false) => layer.compact().without_time().boxed(),
            (_, true) => layer.json().with_timer(UtcTime::rfc_3339()).boxed(),
            (_, false) => layer.json().without_time().boxed(),
        }
    }
}
