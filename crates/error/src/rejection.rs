//! # Rejection Handlers
//!
//! Converts Axum extractor rejections into [`AppError`] values so that
//! malformed requests get the standard error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::AppError;

/// Turn a JSON rejection message into something a client can act on.
///
/// Messages like "missing field `email` at line 1 column 2" become
/// "Missing required field: email".
pub fn json_rejection_message(rejection: &JsonRejection) -> String { friendly_message(&rejection.body_text()) }

fn friendly_message(error_message: &str) -> String {
    if let Some(start) = error_message.find("missing field `") {
        let rest = &error_message[start + 15 ..];
        if let Some(end) = rest.find('`') {
            return format!("Missing required field: {}", &rest[.. end]);
        }
    }
    error_message.to_string()
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self { AppError::bad_request(json_rejection_message(&rejection)) }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self { AppError::bad_request(rejection.body_text()) }
}
