//! PostgreSQL record store

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::warn;

use crate::domain::api_key::{timestamp_now, ApiKeyPatch, ApiKeyRecord};
use crate::domain::storage::{RecordStore, StoreBackend};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_seed_fallback;

use super::file::FileStore;

/// Table holding API key records
pub const API_KEYS_TABLE: &str = "api_keys";

const SELECT_COLUMNS: &str = "id, name, value, created_at, updated_at";

/// Record store over the `api_keys` table
///
/// Listing never fails: a query error is answered with the file store's
/// contents. Writes report query errors to the caller.
pub struct RemoteStore {
    pool: PgPool,
    fallback: Arc<FileStore>,
}

impl Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("table_name", &API_KEYS_TABLE)
            .field("fallback", &self.fallback.path())
            .finish()
    }
}

impl RemoteStore {
    pub fn new(pool: PgPool, fallback: Arc<FileStore>) -> Self {
        Self { pool, fallback }
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the table if it does not exist yet
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ
            )
            "#,
            API_KEYS_TABLE
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    async fn query_all(&self) -> Result<Vec<ApiKeyRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY COALESCE(updated_at, created_at) DESC",
            SELECT_COLUMNS, API_KEYS_TABLE
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }
}

/// Maps a row, reporting `updated_at ?? created_at` as the update time
fn record_from_row(row: &PgRow) -> Result<ApiKeyRecord, sqlx::Error> {
    let id: String = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let value: String = row.try_get("value")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;

    Ok(ApiKeyRecord::from_parts(id, name, value, created_at, updated_at))
}

#[async_trait]
impl RecordStore for RemoteStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Remote
    }

    async fn list_all(&self) -> Vec<ApiKeyRecord> {
        match self.query_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to list API keys from remote store, serving fallback data");
                record_seed_fallback("remote_query");
                self.fallback.list_all().await
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            SELECT_COLUMNS, API_KEYS_TABLE
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to get API key: {}", e)))?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(|e| DomainError::persistence(format!("Failed to decode API key: {}", e)))
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (id, name, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            API_KEYS_TABLE
        );

        sqlx::query(&query)
            .bind(record.id())
            .bind(record.name())
            .bind(record.value())
            .bind(record.created_at())
            .bind(record.updated_at())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to create API key: {}", e)))?;

        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        patch: ApiKeyPatch,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        patch.validate()?;

        let query = format!(
            r#"
            UPDATE {}
            SET name = COALESCE($2, name),
                value = COALESCE($3, value),
                updated_at = GREATEST($4, COALESCE(updated_at, created_at))
            WHERE id = $1
            RETURNING {}
            "#,
            API_KEYS_TABLE, SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.value)
            .bind(timestamp_now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to update API key: {}", e)))?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(|e| DomainError::persistence(format!("Failed to decode API key: {}", e)))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", API_KEYS_TABLE);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::backend_unavailable(format!("Remote storage unreachable: {}", e))
            })?;

        Ok(())
    }
}
