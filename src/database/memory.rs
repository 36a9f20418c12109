use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::store::{unique_fields_for, Document, DocumentStore};
use crate::filter::Filter;

type Collection = HashMap<Uuid, Document>;

/// Process-local store used when no DATABASE_URL is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `doc` if it repeats a unique value held by any other document.
    fn check_unique(
        collection_name: &str,
        collection: &Collection,
        id: Uuid,
        doc: &Document,
    ) -> Result<(), DatabaseError> {
        for field in unique_fields_for(collection_name) {
            let Some(value) = doc.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = collection
                .iter()
                .any(|(other_id, other)| *other_id != id && other.get(field) == Some(value));
            if taken {
                return Err(DatabaseError::Conflict {
                    collection: collection_name.to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, collection: &str, id: Uuid, mut doc: Document) -> Result<Document, DatabaseError> {
        Filter::validate_collection_name(collection)?;
        doc.insert("id".to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(DatabaseError::Conflict {
                collection: collection.to_string(),
                field: "id".to_string(),
            });
        }
        Self::check_unique(collection, docs, id, &doc)?;
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DatabaseError> {
        filter.validate()?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(filter.apply(docs.values().cloned()))
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        mut patch: Document,
    ) -> Result<Option<Document>, DatabaseError> {
        patch.remove("id");

        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(current) = docs.get(&id) else {
            return Ok(None);
        };

        let mut merged = current.clone();
        merged.extend(patch);
        Self::check_unique(collection, docs, id, &merged)?;
        docs.insert(id, merged.clone());
        Ok(Some(merged))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DatabaseError> {
        filter.validate()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|_, doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {}
}
