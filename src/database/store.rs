use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::Filter;

/// A stored record: a JSON object whose `id` matches the key it was inserted under.
pub type Document = Map<String, Value>;

/// Named collections of JSON documents keyed by id.
///
/// Backends only need shallow-merge updates and equality filters; everything
/// richer lives in the typed [`Repository`](crate::database::Repository).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    async fn insert(&self, collection: &str, id: Uuid, doc: Document) -> Result<Document, DatabaseError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DatabaseError>;

    /// Merge `patch` into the stored document. `None` when no document has `id`.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Document,
    ) -> Result<Option<Document>, DatabaseError>;

    /// `true` when a document was removed.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}

pub const COLLECTIONS: &[&str] = &["users", "farms", "activities", "crops", "advisories"];

/// Document fields that must be unique within a collection.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[("users", "email")];

pub(crate) fn unique_fields_for(collection: &str) -> impl Iterator<Item = &'static str> + '_ {
    UNIQUE_FIELDS
        .iter()
        .filter(move |(c, _)| *c == collection)
        .map(|(_, field)| *field)
}
