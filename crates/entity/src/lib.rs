//! Entity definitions for Roster
//!
//! This crate contains the BSON document models stored in MongoDB.

pub mod users;
pub use users::Model as User;
