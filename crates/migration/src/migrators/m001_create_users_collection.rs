//! # Users Collection Indexes
//!
//! Creates the unique email index and the `created_at` index on `users`.

use async_trait::async_trait;
use bson::doc;
use store::{DocumentStore, IndexSpec, StoreError};

use super::USERS;
use crate::Migration;

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateUsersCollection;

#[async_trait]
impl Migration for CreateUsersCollection {
    fn name(&self) -> &str { "001_create_users_collection" }

    async fn up(&self, store: &dyn DocumentStore) -> Result<(), StoreError> {
        store
            .create_index(USERS, IndexSpec::new(doc! { "email": 1 }).unique())
            .await?;
        store
            .create_index(USERS, IndexSpec::new(doc! { "created_at": -1 }))
            .await
    }

    async fn down(&self, store: &dyn DocumentStore) -> Result<(), StoreError> { store.drop_collection(USERS).await }
}

#[cfg(test)]
mod tests {
    use store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_up_creates_indexes() {
        let store = MemoryStore::new("m001");
        CreateUsersCollection.up(&store).await.unwrap();
        assert_eq!(store.index_names(USERS).await, ["email_1", "created_at_-1"]);

        CreateUsersCollection.up(&store).await.unwrap();
        assert_eq!(store.index_names(USERS).await.len(), 2);
    }

    #[tokio::test]
    async fn test_down_drops_collection() {
        let store = MemoryStore::new("m001");
        CreateUsersCollection.up(&store).await.unwrap();
        store.insert_one(USERS, doc! { "email": "a@example.com" }).await.unwrap();

        CreateUsersCollection.down(&store).await.unwrap();
        assert!(!store.has_collection(USERS).await);
    }
}
