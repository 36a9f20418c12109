use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::timestamp;
use crate::database::store::{Document, DocumentStore};
use crate::filter::Filter;

/// A record type stored as one document per id in a named collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human-readable name used in error messages ("Farm not found").
    const LABEL: &'static str;

    fn id(&self) -> Uuid;
}

/// An entity that belongs to exactly one user.
pub trait OwnedEntity: Entity {
    /// Document field holding the owner's user id.
    const OWNER_FIELD: &'static str;

    fn owner_id(&self) -> Uuid;
}

/// Typed access to a collection, converting between entities and documents.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn create(&self, record: &T) -> Result<T, DatabaseError> {
        let doc = to_document(record)?;
        let stored = self.store.insert(T::COLLECTION, record.id(), doc).await?;
        from_document(stored)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn find_many(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        self.store
            .find_many(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        let mut found = self.find_many(&filter.limit(1)).await?;
        Ok(found.pop())
    }

    /// Shallow-merge `patch` into the record and stamp `updatedAt`. `None` if the record is gone.
    pub async fn update(&self, id: Uuid, mut patch: Document) -> Result<Option<T>, DatabaseError> {
        patch.remove("id");
        patch.remove("createdAt");
        patch.insert(
            "updatedAt".to_string(),
            Value::String(timestamp::format(&timestamp::now())),
        );
        self.store
            .update(T::COLLECTION, id, patch)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn delete_many(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        self.store.delete_many(T::COLLECTION, filter).await
    }
}

pub fn to_document<S: Serialize>(value: &S) -> Result<Document, DatabaseError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!(
            "records must serialize to JSON objects, got {}",
            other
        ))),
    }
}

fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
