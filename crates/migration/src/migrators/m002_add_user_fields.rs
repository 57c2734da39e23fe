//! # Extra User Fields
//!
//! Backfills `is_active`, `last_login` and `phone_number` on every user.

use async_trait::async_trait;
use bson::{doc, Bson};
use store::{DocumentStore, StoreError};

use super::USERS;
use crate::Migration;

#[derive(Debug, Clone, Copy, Default)]
pub struct AddUserFields;

#[async_trait]
impl Migration for AddUserFields {
    fn name(&self) -> &str { "002_add_user_fields" }

    async fn up(&self, store: &dyn DocumentStore) -> Result<(), StoreError> {
        let outcome = store
            .update_many(
                USERS,
                doc! {},
                doc! { "$set": { "is_active": true, "last_login": Bson::Null, "phone_number": "" } },
            )
            .await?;
        tracing::debug!(target: "migrate", matched = outcome.matched, "Backfilled user fields");
        Ok(())
    }

    async fn down(&self, store: &dyn DocumentStore) -> Result<(), StoreError> {
        store
            .update_many(
                USERS,
                doc! {},
                doc! { "$unset": { "is_active": "", "last_login": "", "phone_number": "" } },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_up_backfills_and_down_removes() {
        let store = MemoryStore::new("m002");
        store.insert_one(USERS, doc! { "name": "a", "email": "a@example.com" }).await.unwrap();
        store.insert_one(USERS, doc! { "name": "b", "email": "b@example.com" }).await.unwrap();

        AddUserFields.up(&store).await.unwrap();
        for user in store.find(USERS, doc! {}, None).await.unwrap() {
            assert!(user.get_bool("is_active").unwrap());
            assert_eq!(user.get("last_login"), Some(&Bson::Null));
            assert_eq!(user.get_str("phone_number").unwrap(), "");
        }

        AddUserFields.down(&store).await.unwrap();
        for user in store.find(USERS, doc! {}, None).await.unwrap() {
            assert!(!user.contains_key("is_active"));
            assert!(!user.contains_key("last_login"));
            assert!(!user.contains_key("phone_number"));
            assert!(user.contains_key("email"));
        }
    }

    #[tokio::test]
    async fn test_up_on_empty_collection() {
        let store = MemoryStore::new("m002");
        AddUserFields.up(&store).await.unwrap();
        assert_eq!(store.count(USERS, doc! {}).await.unwrap(), 0);
    }
}
