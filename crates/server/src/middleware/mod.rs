//! # HTTP Middleware
//!
//! Custom middleware for request processing.

pub mod request_logger;

pub use request_logger::request_logger_middleware;
