//! # API Response Types
//!
//! Generic API response envelope for the Roster service.
//!
//! ## Response Format
//!
//! ```json
//! { "status": "success", "data": { ... } }
//! { "status": "error", "code": "NOT_FOUND", "message": "User not found" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API response metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// Response timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }
}

/// API response type.
///
/// # Example
///
/// ```rust
/// use error::ApiResponse;
///
/// let response = ApiResponse::ok(vec!["item1", "item2"]);
/// let json = serde_json::to_string(&response).unwrap();
/// assert!(json.contains("\"status\":\"success\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        data: T,

        /// Response metadata.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },

    /// Error response.
    Error {
        /// Error code.
        code: String,

        /// Error message.
        message: String,

        /// Response metadata.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },
}

impl<T> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            data,
            meta: Some(ResponseMeta::default()),
        }
    }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        ApiResponse::Error {
            code:    code.to_string(),
            message: message.to_string(),
            meta:    Some(ResponseMeta::default()),
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data,
                ..
            } => Some(data),
            ApiResponse::Error {
                ..
            } => None,
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }
}
