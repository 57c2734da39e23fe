//! # In-Process Document Store
//!
//! A [`DocumentStore`] held entirely in memory. It understands equality
//! filters, sort specifications, `$set` / `$unset` updates and unique indexes,
//! which covers what the service and its migrations issue.

use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::{ordering, DocumentStore, IndexSpec, StoreError, UpdateOutcome};

#[derive(Debug, Default, Clone)]
struct MemoryCollection {
    documents: Vec<Document>,
    indexes:   Vec<IndexSpec>,
}

impl MemoryCollection {
    /// Check `candidate` against every unique index, ignoring the document at `skip`.
    fn check_unique(&self, name: &str, candidate: &Document, skip: Option<usize>) -> Result<(), StoreError> {
        let id_index = IndexSpec::new(bson::doc! { "_id": 1 }).unique();
        let unique = std::iter::once(&id_index).chain(self.indexes.iter().filter(|index| index.unique));

        for index in unique {
            let clash = self
                .documents
                .iter()
                .enumerate()
                .filter(|(position, _)| Some(*position) != skip)
                .any(|(_, existing)| same_key(&index.keys, existing, candidate));
            if clash {
                return Err(StoreError::duplicate_key(
                    name,
                    format!(
                        "E11000 duplicate key error collection: {} index: {}",
                        name,
                        index.resolved_name()
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn same_key(keys: &Document, a: &Document, b: &Document) -> bool {
    keys.keys()
        .all(|field| ordering::compare(a.get(field), b.get(field)) == Ordering::Equal)
}

fn matches(collection: &str, filter: &Document, document: &Document) -> Result<bool, StoreError> {
    for (field, expected) in filter {
        if field.starts_with('$') {
            return Err(StoreError::query(collection, format!("unsupported operator {}", field)));
        }
        if let Bson::Document(inner) = expected {
            if let Some(operator) = inner.keys().find(|key| key.starts_with('$')) {
                return Err(StoreError::query(collection, format!("unsupported operator {}", operator)));
            }
        }
        if ordering::compare(document.get(field), Some(expected)) != Ordering::Equal {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Apply a `$set` / `$unset` update, returning whether the document changed.
fn apply_update(collection: &str, update: &Document, document: &mut Document) -> Result<bool, StoreError> {
    let before = document.clone();
    for (operator, fields) in update {
        let Bson::Document(fields) = fields
        else {
            return Err(StoreError::query(collection, format!("{} expects a document", operator)));
        };
        match operator.as_str() {
            "$set" => {
                for (field, value) in fields {
                    if field == "_id" && document.get(field) != Some(value) {
                        return Err(StoreError::query(collection, "the _id field is immutable"));
                    }
                    document.insert(field.clone(), value.clone());
                }
            },
            "$unset" => {
                for field in fields.keys() {
                    document.remove(field);
                }
            },
            other => return Err(StoreError::query(collection, format!("unsupported update operator {}", other))),
        }
    }
    Ok(*document != before)
}

/// In-process document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    database:    String,
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    /// Create an empty store for `database`.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database:    database.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Names of the indexes on `collection`, excluding the implicit `_id` index.
    pub async fn index_names(&self, collection: &str) -> Vec<String> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.indexes.iter().map(IndexSpec::resolved_name).collect())
            .unwrap_or_default()
    }

    /// Whether `collection` exists.
    pub async fn has_collection(&self, collection: &str) -> bool { self.collections.read().await.contains_key(collection) }

    async fn update(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
        many: bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(target) = collections.get_mut(collection)
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut outcome = UpdateOutcome::default();
        for position in 0 .. target.documents.len() {
            if !matches(collection, &filter, &target.documents[position])? {
                continue;
            }
            outcome.matched += 1;

            let mut updated = target.documents[position].clone();
            if apply_update(collection, &update, &mut updated)? {
                target.check_unique(collection, &updated, Some(position))?;
                target.documents[position] = updated;
                outcome.modified += 1;
            }
            if !many {
                break;
            }
        }
        Ok(outcome)
    }

    async fn select(
        &self,
        collection: &str,
        filter: &Document,
        sort: Option<&Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(source) = collections.get(collection)
        else {
            return Ok(Vec::new());
        };

        let mut selected = Vec::new();
        for document in &source.documents {
            if matches(collection, filter, document)? {
                selected.push(document.clone());
            }
        }
        if let Some(sort) = sort {
            selected.sort_by(|a, b| ordering::compare_by(sort, a, b));
        }
        Ok(selected)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str { &self.database }

    async fn ping(&self) -> Result<(), StoreError> { Ok(()) }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<Bson, StoreError> {
        if !document.contains_key("_id") {
            let mut with_id = bson::doc! { "_id": ObjectId::new() };
            for (field, value) in document {
                with_id.insert(field, value);
            }
            document = with_id;
        }
        let id = document.get("_id").cloned().unwrap_or(Bson::Null);

        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_owned()).or_default();
        target.check_unique(collection, &document, None)?;
        target.documents.push(document);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .select(collection, &filter, sort.as_ref())
            .await?
            .into_iter()
            .next())
    }

    async fn find(&self, collection: &str, filter: Document, sort: Option<Document>) -> Result<Vec<Document>, StoreError> {
        self.select(collection, &filter, sort.as_ref()).await
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Ok(self.select(collection, &filter, None).await?.len() as u64)
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document) -> Result<UpdateOutcome, StoreError> {
        self.update(collection, filter, update, false).await
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        self.update(collection, filter, update, true).await
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(target) = collections.get_mut(collection)
        else {
            return Ok(0);
        };

        for position in 0 .. target.documents.len() {
            if matches(collection, &filter, &target.documents[position])? {
                target.documents.remove(position);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_owned()).or_default();

        let name = index.resolved_name();
        if let Some(existing) = target.indexes.iter().find(|i| i.resolved_name() == name) {
            if existing.keys == index.keys && existing.unique == index.unique {
                return Ok(());
            }
            return Err(StoreError::query(
                collection,
                format!("an index named {} already exists with different options", name),
            ));
        }

        if index.unique {
            for (position, document) in target.documents.iter().enumerate() {
                let clash = target.documents[position + 1 ..]
                    .iter()
                    .any(|other| same_key(&index.keys, document, other));
                if clash {
                    return Err(StoreError::duplicate_key(
                        collection,
                        format!("E11000 duplicate key error building index {}", name),
                    ));
                }
            }
        }

        target.indexes.push(index);
        Ok(())
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.collections.write().await.remove(collection);
        Ok(())
    }
}
