//! Health check response types.

use serde::{Deserialize, Serialize};

/// Reachability of a backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// Response for `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every component is up, `degraded` otherwise
    pub status:         String,
    pub store:          ComponentStatus,
    pub cache:          ComponentStatus,
    pub uptime_seconds: u64,
    pub version:        String,
}
