//! # Migration Modules
//!
//! Each migration is a separate module implementing [`Migration`](crate::Migration).

pub mod m001_create_users_collection;
pub mod m002_add_user_fields;

/// Application collection the shipped migrations operate on.
pub(crate) const USERS: &str = "users";
