use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::manager::DatabaseError;
use crate::database::store::{unique_fields_for, Document, DocumentStore, COLLECTIONS};
use crate::filter::Filter;

/// Postgres-backed store: one table per collection holding a JSONB document per row.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create collection tables and indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for collection in COLLECTIONS {
            for statement in Self::migration_sql(collection)? {
                sqlx::query(&statement).execute(&self.pool).await?;
            }
            debug!("Ensured collection table: {}", collection);
        }
        info!("Migrated {} collections", COLLECTIONS.len());
        Ok(())
    }

    fn migration_sql(collection: &str) -> Result<Vec<String>, DatabaseError> {
        Filter::validate_collection_name(collection)?;
        let mut statements = vec![
            format!(
                "CREATE TABLE IF NOT EXISTS \"{c}\" (\
                 id UUID PRIMARY KEY, \
                 doc JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                 updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
                c = collection
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS \"{c}_doc_idx\" ON \"{c}\" USING GIN (doc jsonb_path_ops)",
                c = collection
            ),
        ];
        for field in unique_fields_for(collection) {
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{c}_{f}_key\" ON \"{c}\" ((doc->>'{f}'))",
                c = collection,
                f = field
            ));
        }
        Ok(statements)
    }

    fn table(collection: &str) -> Result<String, DatabaseError> {
        Filter::validate_collection_name(collection)?;
        Ok(format!("\"{}\"", collection))
    }

    /// Map a unique-index violation onto the field it guards.
    fn classify(collection: &str, err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let field = db_err
                    .constraint()
                    .and_then(|name| {
                        unique_fields_for(collection).find(|f| name == format!("{}_{}_key", collection, f))
                    })
                    .unwrap_or("id");
                return DatabaseError::Conflict {
                    collection: collection.to_string(),
                    field: field.to_string(),
                };
            }
        }
        err.into()
    }

    fn into_document(value: Value) -> Result<Document, DatabaseError> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(DatabaseError::QueryError(format!(
                "expected a JSON object in doc column, found {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, collection: &str, id: Uuid, mut doc: Document) -> Result<Document, DatabaseError> {
        let table = Self::table(collection)?;
        doc.insert("id".to_string(), Value::String(id.to_string()));

        let stored: Value = sqlx::query_scalar(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING doc",
            table
        ))
        .bind(id)
        .bind(Value::Object(doc))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::classify(collection, e))?;

        Self::into_document(stored)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let table = Self::table(collection)?;
        let found: Option<Value> = sqlx::query_scalar(&format!("SELECT doc FROM {} WHERE id = $1", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found.map(Self::into_document).transpose()
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DatabaseError> {
        let sql = filter.to_sql(collection)?;
        let mut query = sqlx::query_scalar::<_, Value>(&sql.query);
        for param in sql.params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::into_document).collect()
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        mut patch: Document,
    ) -> Result<Option<Document>, DatabaseError> {
        let table = Self::table(collection)?;
        patch.remove("id");

        let updated: Option<Value> = sqlx::query_scalar(&format!(
            "UPDATE {} SET doc = doc || $2, updated_at = now() WHERE id = $1 RETURNING doc",
            table
        ))
        .bind(id)
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::classify(collection, e))?;

        updated.map(Self::into_document).transpose()
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError> {
        let table = Self::table(collection)?;
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DatabaseError> {
        let sql = filter.to_delete_sql(collection)?;
        let mut query = sqlx::query(&sql.query);
        for param in sql.params {
            query = query.bind(param);
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed Postgres pool");
    }
}
