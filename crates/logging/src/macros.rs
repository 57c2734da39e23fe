//! # Logging Macros
//!
//! Convenience macros for structured logging.
//! These macros provide consistent targets and field names across crates.

/// Log an API request with method, path, status and latency.
#[macro_export]
macro_rules! log_api_request {
    ($request_id:expr, $method:expr, $path:expr, $status:expr, $duration_ms:expr) => {
        $crate::tracing::info!(
            target: "api",
            request_id = %$request_id,
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration_ms,
            "API request"
        )
    };
}

/// Log a document store operation with collection and duration.
#[macro_export]
macro_rules! log_store_operation {
    ($operation:expr, $collection:expr, $duration_ms:expr) => {
        $crate::tracing::debug!(
            target: "store",
            operation = %$operation,
            collection = %$collection,
            duration_ms = %$duration_ms,
            "Store operation"
        )
    };
}

/// Log a cache operation with key and result.
#[macro_export]
macro_rules! log_cache_operation {
    ($operation:expr, $key:expr, $hit:expr) => {
        $crate::tracing::debug!(
            target: "cache",
            operation = %$operation,
            key = %$key,
            hit = $hit,
            "Cache operation"
        )
    };
}

/// Log a migration lifecycle event.
///
/// # Example
///
/// ```rust
/// use logging::log_migration_event;
///
/// log_migration_event!("applied", "001_create_users_collection");
/// ```
#[macro_export]
macro_rules! log_migration_event {
    ($event:expr, $name:expr) => {
        $crate::tracing::info!(
            target: "migrate",
            event = %$event,
            migration = %$name,
            "Migration event"
        )
    };
}

/// Measure and log the duration of a block of code.
///
/// # Example
///
/// ```rust
/// use logging::measure_duration;
///
/// let result = measure_duration!("store", "users", { 40 + 2 });
/// assert_eq!(result, 42);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $context:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        $crate::tracing::debug!(
            target: $target,
            context = %$context,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Operation completed"
        );
        result
    }};
}
