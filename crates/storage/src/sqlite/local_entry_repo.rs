use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::collections::HashMap;

use crate::repository::{ProgressRepository, ProgressScope, SessionRepository, StorageError};
use tracker_core::model::{FileId, FileProgress, FileRow, UserSession};

use super::SqliteRepository;

const SESSION_KEY: &str = "tuhfah-user";

fn progress_key(scope: &ProgressScope) -> String {
    format!("tuhfah-tracker:{}:{}", scope.user_email, scope.section_id)
}

impl SqliteRepository {
    async fn read_entry(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM local_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn write_entry(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO local_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn delete_entry(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM local_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<Option<UserSession>, StorageError> {
        let Some(value) = self.read_entry(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&value) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed stored session");
                Ok(None)
            }
        }
    }

    async fn save_session(&self, session: &UserSession) -> Result<(), StorageError> {
        let value = serde_json::to_string(session)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.write_entry(SESSION_KEY, &value).await
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        self.delete_entry(SESSION_KEY).await
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(
        &self,
        scope: &ProgressScope,
    ) -> Result<HashMap<FileId, FileProgress>, StorageError> {
        let rows = self.read_rows(scope).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id.clone(), row.progress()))
            .collect())
    }

    async fn upsert_row(&self, scope: &ProgressScope, row: &FileRow) -> Result<(), StorageError> {
        let mut rows = self.read_rows(scope).await?;
        match rows.iter_mut().find(|stored| stored.id == row.id) {
            Some(stored) => *stored = row.clone(),
            None => rows.push(row.clone()),
        }

        let value = serde_json::to_string(&rows)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.write_entry(&progress_key(scope), &value).await
    }
}

impl SqliteRepository {
    /// Reads the stored row array for a scope. Rows for files that have
    /// dropped out of the folder listing stay in the array untouched.
    async fn read_rows(&self, scope: &ProgressScope) -> Result<Vec<FileRow>, StorageError> {
        let Some(value) = self.read_entry(&progress_key(scope)).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&value) {
            Ok(rows) => Ok(rows),
            Err(err) => {
                tracing::warn!(
                    key = %progress_key(scope),
                    error = %err,
                    "ignoring malformed progress entry"
                );
                Ok(Vec::new())
            }
        }
    }
}
