//! # Migration Registry
//!
//! The ordered list of migrations shipped with the service.

use crate::{
    migrators::{m001_create_users_collection::CreateUsersCollection, m002_add_user_fields::AddUserFields},
    Migration,
};

/// Every migration, in application order.
///
/// Add new migrations to the end of this list. The order here is the only
/// ordering signal the manager uses.
pub fn migrations() -> Vec<Box<dyn Migration>> { vec![Box::new(CreateUsersCollection), Box::new(AddUserFields)] }
