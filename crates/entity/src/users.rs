//! Users Entity
//!
//! Represents a user record as stored in the `users` collection.

use bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Collection holding user documents.
pub const COLLECTION: &str = "users";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id:           Option<ObjectId>,
    pub name:         String,
    pub email:        String,
    #[serde(default = "default::bool_true")]
    pub is_active:    bool,
    #[serde(default)]
    pub last_login:   Option<DateTime>,
    #[serde(default)]
    pub phone_number: String,
    pub created_at:   DateTime,
    pub updated_at:   DateTime,
}

mod default {
    pub fn bool_true() -> bool { true }
}

impl Model {
    /// A new, not yet persisted user stamped with the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            id:           None,
            name:         name.into(),
            email:        email.into(),
            is_active:    true,
            last_login:   None,
            phone_number: String::new(),
            created_at:   now,
            updated_at:   now,
        }
    }

    /// Hex form of the id, empty when the user has not been stored yet.
    pub fn id_hex(&self) -> String { self.id.map(|id| id.to_hex()).unwrap_or_default() }

    /// Convert into a BSON document for insertion.
    pub fn to_document(&self) -> Result<Document, bson::ser::Error> { bson::to_document(self) }

    /// Decode a stored document.
    pub fn from_document(document: Document) -> Result<Self, bson::de::Error> { bson::from_document(document) }
}
