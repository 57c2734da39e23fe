//! # API Router Configuration
//!
//! Configures API routes for the Roster application.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
        State as AxumState,
    },
    http::StatusCode,
    middleware,
    routing::get,
    Json,
    Router,
};
use error::{ApiResponse, Result};

use crate::{
    dto::{
        health::HealthResponse,
        users::{CreateUserRequest, UpdateUserRequest, UserResponse},
    },
    handlers,
    middleware::request_logger_middleware,
    AppState,
};

/// Creates the users API router
///
/// # Arguments
///
/// * `state` - Application state holding the store and user service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/api/v1/users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}

/// Wrapper handler for user creation that uses State extractor
async fn create_user_handler(
    AxumState(state): AxumState<AppState>,
    body: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let Json(req) = body?;
    handlers::users::create_user_handler_inner(&state, req).await
}

/// Wrapper handler for listing users
async fn list_users_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ApiResponse<Vec<UserResponse>>>> {
    handlers::users::list_users_handler_inner(&state).await
}

/// Wrapper handler for fetching a single user
async fn get_user_handler(
    AxumState(state): AxumState<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let Path(id) = path?;
    handlers::users::get_user_handler_inner(&state, &id).await
}

/// Wrapper handler for updating a user
async fn update_user_handler(
    AxumState(state): AxumState<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let Path(id) = path?;
    let Json(req) = body?;
    handlers::users::update_user_handler_inner(&state, &id, req).await
}

/// Wrapper handler for deleting a user
async fn delete_user_handler(
    AxumState(state): AxumState<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = path?;
    handlers::users::delete_user_handler_inner(&state, &id).await
}

/// Wrapper handler for the health check
async fn health_handler(AxumState(state): AxumState<AppState>) -> (StatusCode, Json<HealthResponse>) {
    handlers::health::health_handler_inner(&state).await
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router { Router::new().route("/health", get(health_handler)).with_state(state) }

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state holding the store and user service
///
/// # Returns
///
/// Main router with health checks and API routes, wrapped in request logging
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state))
        .layer(middleware::from_fn(request_logger_middleware))
}
