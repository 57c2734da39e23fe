//! # Users API Integration Tests
//!
//! Exercises the full router, middleware included, over in-process backends.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{empty_request, json_request, memory_cache_config, raw_request, send, FailingCache, SwitchableStore, TestApp};
use logging::REQUEST_ID_HEADER;
use serde_json::json;
use server::{cache::UserCache as _, create_app_router, AppState};
use store::ObjectId;

#[tokio::test]
async fn test_create_user_returns_201() {
    let app = TestApp::new().await;

    let (status, headers, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/users",
            json!({ "name": "Ada Lovelace", "email": "ada@example.com", "phone_number": "+15550100" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(headers.contains_key(REQUEST_ID_HEADER));
    assert_eq!(body["status"], "success");
    let user = &body["data"];
    assert_eq!(user["name"], "Ada Lovelace");
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["phone_number"], "+15550100");
    assert_eq!(user["is_active"], true);
    assert!(user["last_login"].is_null());
    assert_eq!(user["id"].as_str().unwrap().len(), 24);
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = TestApp::new().await;

    let (status, _, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/users",
            json!({ "name": "", "email": "ada@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/users",
            json!({ "name": "Ada", "email": "not-an-email" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn test_create_user_rejects_malformed_json() {
    let app = TestApp::new().await;

    let (status, _, body) = app
        .send(json_request(Method::POST, "/api/v1/users", json!({ "name": "Ada" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing required field: email");

    let (status, _, body) = app
        .send(raw_request(Method::POST, "/api/v1/users", "text/plain", "hello"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.com").await;

    let (status, _, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/users",
            json!({ "name": "Imposter", "email": "ada@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_list_users_oldest_first() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send(empty_request(Method::GET, "/api/v1/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let first = app.create_user("Ada", "ada@example.com").await;
    let second = app.create_user("Grace", "grace@example.com").await;

    let (_, _, body) = app.send(empty_request(Method::GET, "/api/v1/users")).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn test_get_user_and_cache_fill() {
    let app = TestApp::new().await;
    let id = app.create_user("Ada", "ada@example.com").await;
    assert!(app.cache.is_empty().await);

    let (status, _, body) = app.send(empty_request(Method::GET, &format!("/api/v1/users/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert!(app.cache.get(&format!("user:{}", id)).await.unwrap().is_some());

    // Served from the cache while the store is down
    app.store.set_down(true);
    let (status, _, body) = app.send(empty_request(Method::GET, &format!("/api/v1/users/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");
}

#[tokio::test]
async fn test_get_user_bad_and_missing_ids() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send(empty_request(Method::GET, "/api/v1/users/not-hex")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid id format"));

    let missing = ObjectId::new().to_hex();
    let (status, _, body) = app
        .send(empty_request(Method::GET, &format!("/api/v1/users/{}", missing)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_update_user_invalidates_cache() {
    let app = TestApp::new().await;
    let id = app.create_user("Ada", "ada@example.com").await;
    let uri = format!("/api/v1/users/{}", id);

    app.send(empty_request(Method::GET, &uri)).await;
    assert_eq!(app.cache.len().await, 1);

    let (status, _, body) = app
        .send(json_request(Method::PUT, &uri, json!({ "name": "Ada King", "is_active": false })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada King");
    assert_eq!(body["data"]["is_active"], false);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(app.cache.is_empty().await);

    let (_, _, body) = app.send(empty_request(Method::GET, &uri)).await;
    assert_eq!(body["data"]["name"], "Ada King");
}

#[tokio::test]
async fn test_update_user_errors() {
    let app = TestApp::new().await;
    let id = app.create_user("Ada", "ada@example.com").await;
    app.create_user("Grace", "grace@example.com").await;
    let uri = format!("/api/v1/users/{}", id);

    let (status, _, _) = app.send(json_request(Method::PUT, &uri, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = app
        .send(json_request(Method::PUT, &uri, json!({ "email": "grace@example.com" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = app
        .send(json_request(Method::PUT, &uri, json!({ "email": "nope" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = format!("/api/v1/users/{}", ObjectId::new().to_hex());
    let (status, _, _) = app.send(json_request(Method::PUT, &missing, json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;
    let id = app.create_user("Ada", "ada@example.com").await;
    let uri = format!("/api/v1/users/{}", id);
    app.send(empty_request(Method::GET, &uri)).await;

    let (status, _, body) = app.send(empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert!(app.cache.is_empty().await);

    let (status, _, _) = app.send(empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app.send(empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_failures_do_not_fail_requests() {
    common::init_test_env();
    let store = Arc::new(SwitchableStore::default());
    let state = AppState::new(store, Arc::new(FailingCache), memory_cache_config());
    let router = create_app_router(state);

    let (status, _, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/users",
            json!({ "name": "Ada", "email": "ada@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/users/{}", body["data"]["id"].as_str().unwrap());

    let (status, _, _) = send(&router, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&router, json_request(Method::PUT, &uri, json!({ "name": "Grace" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&router, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_store_outage_is_opaque() {
    let app = TestApp::new().await;
    app.store.set_down(true);

    let (status, _, body) = app.send(empty_request(Method::GET, "/api/v1/users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new().await;
    let (status, _, _) = app.send(empty_request(Method::GET, "/api/v2/users")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
