//! # User Handlers
//!
//! HTTP request handlers for user management endpoints.

use axum::{http::StatusCode, Json};
use error::{ApiResponse, AppError, Result};
use validator::Validate;

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserResponse},
    AppState,
};

/// Create a user
///
/// # Returns
///
/// `201 Created` with the stored user
pub async fn create_user_handler_inner(
    state: &AppState,
    req: CreateUserRequest,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    req.validate()?;

    let user = state.users.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// List all users
pub async fn list_users_handler_inner(state: &AppState) -> Result<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// Get one user by id
pub async fn get_user_handler_inner(state: &AppState, id: &str) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = state.users.get_user(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Update a user
///
/// Only the fields present in the body are changed. An empty body is rejected.
pub async fn update_user_handler_inner(
    state: &AppState,
    id: &str,
    req: UpdateUserRequest,
) -> Result<Json<ApiResponse<UserResponse>>> {
    req.validate()?;
    if req.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let user = state.users.update_user(id, req).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Delete a user
///
/// # Returns
///
/// `204 No Content`
pub async fn delete_user_handler_inner(state: &AppState, id: &str) -> Result<StatusCode> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
