//! # Error Response Conversion
//!
//! Converts [`AppError`] values into JSON HTTP responses.
//!
//! ## Usage
//!
//! ```rust
//! use error::{middleware::ErrorHandler, AppError};
//!
//! let handler = ErrorHandler::new(false);
//! let error = AppError::not_found("User not found");
//! let response = handler.to_response(&error);
//! assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ApiResponse, AppError};

/// Error handler that converts errors to HTTP responses.
#[derive(Debug, Clone, Copy)]
pub struct ErrorHandler {
    /// Whether to include server-side error details in response.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Build a handler from the `ROSTER_ENV` environment variable.
    ///
    /// Details are exposed only in `development`.
    pub fn from_env() -> Self {
        let environment = std::env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_string());
        Self::new(environment == "development")
    }

    /// Convert an error to a response.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let message = if self.include_details || err.is_client_error() {
            err.message()
        }
        else {
            match status {
                StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
                _ => "An error occurred".to_string(),
            }
        };

        if status.is_server_error() {
            tracing::error!(target: "api", code = err.code(), error = %err, "Request failed");
        }

        let body = ApiResponse::<()>::error(err.code(), message);
        let mut response = (status, Json(body)).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

impl Default for ErrorHandler {
    fn default() -> Self { Self::from_env() }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::default().to_response(&self) }
}
