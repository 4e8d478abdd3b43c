//! SQLite connection pooling for the document store.
//!
//! Pools are built from the `database` section of the crate configuration:
//! the file path (parent directory created on first use) and the pool size.
//! WAL journaling keeps concurrent readers off the writer's back.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::domain::models::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("could not open database at {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("database path is not a valid sqlite target: {0}")]
    InvalidPath(String),
    #[error("could not create database directory: {0}")]
    DirectoryCreation(#[source] std::io::Error),
}

/// Open a pool for the configured database file, creating the file and its
/// parent directory if needed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, ConnectionError> {
    let path = Path::new(&config.path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(ConnectionError::DirectoryCreation)?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path))
        .map_err(|_| ConnectionError::InvalidPath(config.path.clone()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|source| ConnectionError::OpenFailed {
            path: config.path.clone(),
            source,
        })
}

/// Single-connection in-memory pool for tests.
pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|_| ConnectionError::InvalidPath(":memory:".to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .shared_cache(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|source| ConnectionError::OpenFailed {
            path: ":memory:".to_string(),
            source,
        })
}
