//! # Health Endpoint Tests

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{empty_request, memory_cache_config, send, FailingCache, SwitchableStore, TestApp};
use server::{create_app_router, AppState};

#[tokio::test]
async fn test_health_ok() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send(empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "up");
    assert_eq!(body["cache"], "up");
    assert!(body["uptime_seconds"].is_u64());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_store_down_is_503() {
    let app = TestApp::new().await;
    app.store.set_down(true);

    let (status, _, body) = app.send(empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "down");
}

#[tokio::test]
async fn test_health_cache_down_is_degraded() {
    common::init_test_env();
    let state = AppState::new(
        Arc::new(SwitchableStore::default()),
        Arc::new(FailingCache),
        memory_cache_config(),
    );

    let (status, _, body) = send(&create_app_router(state), empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["cache"], "down");
    assert_eq!(body["store"], "up");
}
