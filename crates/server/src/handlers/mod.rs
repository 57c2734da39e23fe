//! # Request Handlers
//!
//! Handler bodies called by the router's extractor wrappers.

pub mod health;
pub mod users;
