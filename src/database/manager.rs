use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::DocumentStore;
use crate::filter::FilterError;

/// Errors raised by document stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The backend could not be reached. Callers surface this as 503, never as "not found".
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate value for unique field {collection}.{field}")]
    Conflict { collection: String, field: String },

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::Unavailable(err.to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Opens the document store selected by configuration.
///
/// One store is created at startup and shared through application state;
/// call [`DocumentStore::close`] once after the server has drained.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, DatabaseError> {
        match config.url.as_deref() {
            Some(url) => {
                let redacted = Self::redact_url(url)?;
                info!("Connecting to Postgres at {}", redacted);
                let store = PgStore::connect(url, config).await?;
                store.migrate().await?;
                info!("Postgres document store ready");
                Ok(Arc::new(store))
            }
            None => {
                warn!("DATABASE_URL not set; using the in-memory store, data will not survive a restart");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    /// Connection string with the password masked, for logs.
    pub fn redact_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
