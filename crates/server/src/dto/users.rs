//! # User Data Transfer Objects
//!
//! Request and response types for user management endpoints.

use chrono::{DateTime, Utc};
use entity::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a new user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// User's display name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:         String,
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email:        String,
    /// Optional phone number
    #[validate(length(max = 32, message = "Phone number must not exceed 32 characters"))]
    pub phone_number: Option<String>,
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:         Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email:        Option<String>,
    #[validate(length(max = 32, message = "Phone number must not exceed 32 characters"))]
    pub phone_number: Option<String>,
    pub is_active:    Option<bool>,
}

impl UpdateUserRequest {
    /// Whether the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone_number.is_none() && self.is_active.is_none()
    }
}

/// User as returned by the API and held in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// Hex ObjectId
    pub id:           String,
    pub name:         String,
    pub email:        String,
    pub is_active:    bool,
    pub last_login:   Option<DateTime<Utc>>,
    pub phone_number: String,
    pub created_at:   DateTime<Utc>,
    pub updated_at:   DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id:           user.id_hex(),
            name:         user.name.clone(),
            email:        user.email.clone(),
            is_active:    user.is_active,
            last_login:   user.last_login.map(|t| t.to_chrono()),
            phone_number: user.phone_number.clone(),
            created_at:   user.created_at.to_chrono(),
            updated_at:   user.updated_at.to_chrono(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self { Self::from(&user) }
}
