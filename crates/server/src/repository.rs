//! # User Repository
//!
//! Persistence of user documents in the `users` collection.

use std::sync::Arc;

use async_trait::async_trait;
use entity::{users::COLLECTION, User};
use error::{AppError, Result};
use store::{doc, parse_object_id, Bson, DocumentStore, ObjectId, StoreError};

/// Field changes applied by [`UserRepository::update`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name:         Option<String>,
    pub email:        Option<String>,
    pub phone_number: Option<String>,
    pub is_active:    Option<bool>,
}

/// User persistence operations.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new user and return it with its id set.
    async fn create(&self, user: User) -> Result<User>;

    /// All users, oldest first.
    async fn find_all(&self) -> Result<Vec<User>>;

    /// The user with `id`.
    async fn find_by_id(&self, id: &str) -> Result<User>;

    /// Apply `changes` to the user with `id` and return the stored result.
    async fn update(&self, id: &str, changes: UserChanges) -> Result<User>;

    /// Remove the user with `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// [`UserRepository`] over a [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct DocumentUserRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
        }
    }
}

fn object_id(id: &str) -> Result<ObjectId> { Ok(parse_object_id(id)?) }

fn not_found() -> AppError { AppError::not_found("User not found") }

/// Report unique-email violations as a conflict with a readable message.
fn map_write_error(err: StoreError) -> AppError {
    if err.is_duplicate_key() {
        AppError::conflict("A user with this email already exists")
    }
    else {
        err.into()
    }
}

fn decode(document: store::Document) -> Result<User> {
    User::from_document(document).map_err(|e| AppError::database(format!("Invalid user document: {}", e)))
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn create(&self, mut user: User) -> Result<User> {
        let now = store::bson::DateTime::now();
        user.id = None;
        user.created_at = now;
        user.updated_at = now;

        let document = user
            .to_document()
            .map_err(|e| AppError::internal(format!("Failed to encode user: {}", e)))?;
        let inserted = self
            .store
            .insert_one(COLLECTION, document)
            .await
            .map_err(map_write_error)?;

        match inserted {
            Bson::ObjectId(id) => user.id = Some(id),
            other => return Err(AppError::database(format!("Unexpected user id {}", other))),
        }
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.store
            .find(COLLECTION, doc! {}, Some(doc! { "created_at": 1, "_id": 1 }))
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<User> {
        let id = object_id(id)?;
        let document = self
            .store
            .find_one(COLLECTION, doc! { "_id": id }, None)
            .await?
            .ok_or_else(not_found)?;
        decode(document)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<User> {
        let oid = object_id(id)?;

        let mut set = doc! { "updated_at": store::bson::DateTime::now() };
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(email) = changes.email {
            set.insert("email", email);
        }
        if let Some(phone_number) = changes.phone_number {
            set.insert("phone_number", phone_number);
        }
        if let Some(is_active) = changes.is_active {
            set.insert("is_active", is_active);
        }

        let outcome = self
            .store
            .update_one(COLLECTION, doc! { "_id": oid }, doc! { "$set": set })
            .await
            .map_err(map_write_error)?;
        if outcome.matched == 0 {
            return Err(not_found());
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = object_id(id)?;
        let deleted = self.store.delete_one(COLLECTION, doc! { "_id": id }).await?;
        if deleted == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
