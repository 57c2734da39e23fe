//! # Request ID Tracking
//!
//! Utilities for generating and propagating request IDs across the service.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use std::{fmt, str::FromStr};

/// Header used to receive and echo request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String { self.0 }

    /// Reuse a client-supplied ID when it looks sane, otherwise mint a new one.
    pub fn from_header_or_new(value: Option<&str>) -> Self {
        value
            .and_then(try_from_header)
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_from_header(s).ok_or_else(|| "Invalid request ID format".to_string())
    }
}

/// Try to get the request ID from a header value.
///
/// Accepts 20 to 64 characters of `[A-Za-z0-9_-]`.
pub fn try_from_header(value: &str) -> Option<RequestId> {
    let value = value.trim();
    if (20 ..= 64).contains(&value.len()) &&
        value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some(RequestId(value.to_string()))
    }
    else {
        None
    }
}
