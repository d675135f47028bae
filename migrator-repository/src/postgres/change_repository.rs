//! PostgreSQL implementation of the change repository.
//!
//! Stores change records in a `migration_changelog` table keyed on
//! `(change_id, author)` so that the store itself rejects a second record
//! for the same migration unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migrator_shared::types::ChangeRecord;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, Row};

use crate::ChangeRepository;
use crate::errors::ChangeRepositoryError;

/// PostgreSQL-backed change repository.
pub struct PostgresChangeRepository {
    pool: sqlx::Pool<Postgres>,
}

impl PostgresChangeRepository {
    /// Creates a new repository connected to the given database.
    pub async fn new(database_url: &str) -> Result<Self, ChangeRepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(PostgresChangeRepository { pool })
    }

    /// Creates a repository over an existing pool.
    pub fn with_pool(pool: sqlx::Pool<Postgres>) -> Self {
        PostgresChangeRepository { pool }
    }

    /// Creates the changelog table if it does not exist yet.
    ///
    /// The primary key on `(change_id, author)` enforces the natural key of
    /// change records at the store level.
    pub async fn ensure_schema(&self) -> Result<(), ChangeRepositoryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS migration_changelog ( \
                 change_id text NOT NULL, \
                 author text NOT NULL, \
                 execution_id text NOT NULL, \
                 executed_at timestamptz, \
                 state text NOT NULL, \
                 origin_class text, \
                 origin_method text, \
                 execution_millis bigint NOT NULL, \
                 metadata jsonb NOT NULL DEFAULT '{}'::jsonb, \
                 PRIMARY KEY (change_id, author) \
             )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches a single record by its natural key. Intended for inspection
    /// and tests rather than the hot path.
    pub async fn find(
        &self,
        change_id: &str,
        author: &str,
    ) -> Result<Option<ChangeRecord>, ChangeRepositoryError> {
        let row = sqlx::query(
            "SELECT execution_id, change_id, author, executed_at, state, \
                    origin_class, origin_method, execution_millis, metadata \
             FROM migration_changelog WHERE change_id = $1 AND author = $2",
        )
        .bind(change_id)
        .bind(author)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let state: String = row.try_get("state")?;
        let metadata: Value = row.try_get("metadata")?;
        let metadata = match metadata {
            Value::Object(map) => map,
            other => serde_json::from_value(other)?,
        };

        Ok(Some(ChangeRecord {
            execution_id: row.try_get("execution_id")?,
            change_id: row.try_get("change_id")?,
            author: row.try_get("author")?,
            timestamp: row.try_get::<Option<DateTime<Utc>>, _>("executed_at")?,
            state: serde_json::from_value(Value::from(state))?,
            origin_class: row.try_get("origin_class")?,
            origin_method: row.try_get("origin_method")?,
            execution_millis: row.try_get("execution_millis")?,
            metadata,
        }))
    }
}

#[async_trait]
impl ChangeRepository for PostgresChangeRepository {
    async fn is_already_executed(
        &self,
        change_id: &str,
        author: &str,
    ) -> Result<bool, ChangeRepositoryError> {
        let found = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM migration_changelog WHERE change_id = $1 AND author = $2",
        )
        .bind(change_id)
        .bind(author)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn save(&self, record: &ChangeRecord) -> Result<(), ChangeRepositoryError> {
        let metadata = Value::Object(record.metadata.clone());

        sqlx::query(
            "INSERT INTO migration_changelog \
                 (change_id, author, execution_id, executed_at, state, \
                  origin_class, origin_method, execution_millis, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&record.change_id)
        .bind(&record.author)
        .bind(&record.execution_id)
        .bind(record.timestamp)
        .bind(record.state.as_str())
        .bind(&record.origin_class)
        .bind(&record.origin_method)
        .bind(record.execution_millis)
        .bind(&metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
