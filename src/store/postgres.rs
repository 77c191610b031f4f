//! PostgreSQL blob store.
//!
//! Blobs are rows of the `kv_blobs` table. A write is a single upsert, so the
//! database commits the new value atomically.

use super::{BlobStore, StoreError};
use crate::db::DbPool;
use async_trait::async_trait;

/// Blob store backed by the `kv_blobs` table.
#[derive(Debug, Clone)]
pub struct PgBlobStore {
    pool: DbPool,
}

impl PgBlobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_blobs WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn set(&self, name: &str, value: String) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_blobs (name, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO UPDATE
            SET value = EXCLUDED.value,
                updated_at = NOW()
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
