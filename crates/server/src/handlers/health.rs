//! Health check handler.

use axum::{http::StatusCode, Json};
use tracing::warn;

use crate::{
    dto::health::{ComponentStatus, HealthResponse},
    AppState,
};

fn component(reachable: bool) -> ComponentStatus {
    if reachable {
        ComponentStatus::Up
    }
    else {
        ComponentStatus::Down
    }
}

/// Report store and cache reachability.
///
/// The service is unusable without the store, so a store outage answers
/// `503`. A cache outage only degrades reads and still answers `200`.
pub async fn health_handler_inner(state: &AppState) -> (StatusCode, Json<HealthResponse>) {
    let store_up = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(target: "store", error = %e, "Store ping failed");
            false
        },
    };
    let cache_up = state.users.cache_reachable().await;

    let status = if store_up && cache_up { "ok" } else { "degraded" };
    let code = if store_up {
        StatusCode::OK
    }
    else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status:         status.to_owned(),
        store:          component(store_up),
        cache:          component(cache_up),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version:        env!("CARGO_PKG_VERSION").to_owned(),
    };
    (code, Json(body))
}
