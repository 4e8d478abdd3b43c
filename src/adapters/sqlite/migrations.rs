//! Embedded schema migrations for the document store.
//!
//! Migrations are compiled into the binary and applied in version order; the
//! `schema_migrations` table records what has already run, so re-running the
//! migrator against an up-to-date database is a no-op.

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {version} failed: {source}")]
    Apply {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("could not read schema version: {0}")]
    VersionQuery(#[source] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub sql: String,
}

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version, in
    /// order. Returns how many were applied.
    pub async fn apply_pending(&self, migrations: Vec<Migration>) -> Result<usize, MigrationError> {
        self.ensure_ledger().await?;
        let current = self.current_version().await?;

        let mut applied = 0;
        for migration in migrations.into_iter().filter(|m| m.version > current) {
            self.apply(&migration).await?;
            applied += 1;
        }
        Ok(applied)
    }

    pub async fn current_version(&self) -> Result<i64, MigrationError> {
        let (version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await
                .map_err(MigrationError::VersionQuery)?;
        Ok(version)
    }

    async fn ensure_ledger(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|source| MigrationError::Apply { version: 0, source })?;
        Ok(())
    }

    async fn apply(&self, migration: &Migration) -> Result<(), MigrationError> {
        let fail = |source| MigrationError::Apply {
            version: migration.version,
            source,
        };

        sqlx::raw_sql(&migration.sql)
            .execute(&self.pool)
            .await
            .map_err(fail)?;

        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(fail)?;
        Ok(())
    }
}

pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "documents table and collection index".to_string(),
        sql: include_str!("../../../migrations/001_initial_schema.sql").to_string(),
    }]
}
