//! SQLite storage backend for FitTrack.
//!
//! All records live in a single `records` table tagged by kind. Routine
//! names are ordinary bound key values, never table names.

use async_trait::async_trait;
use fittrack_core::{Exercise, ExerciseFilter, Goal, Routine, RoutineEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, warn};

use crate::record::RecordKind;
use super::trait_::{Storage, StorageError, Result};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) a database file.
    pub async fn new_from_path(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        debug!("Opened SQLite storage at {}", path.display());

        Ok(storage)
    }

    /// Create an in-memory SQLite storage for testing.
    pub async fn in_memory() -> Result<Self> {
        // A single connection, otherwise each pooled connection gets its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_error)?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS records (
                kind TEXT NOT NULL,
                key TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (kind, key)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    /// Check if the database is healthy.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        kind: RecordKind,
        key: &str,
        data: &T,
    ) -> Result<()> {
        let data = serde_json::to_string(data)?;
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO records (kind, key, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)",
        )
        .bind(kind.as_str())
        .bind(key)
        .bind(data)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StorageError::duplicate(kind, key))
            }
            Err(e) => Err(db_error(e)),
        }
    }

    async fn replace<T: Serialize + Sync>(
        &self,
        kind: RecordKind,
        key: &str,
        data: &T,
    ) -> Result<()> {
        let data = serde_json::to_string(data)?;

        let result = sqlx::query(
            "UPDATE records SET data = ?, updated_at = ? WHERE kind = ? AND key = ?",
        )
        .bind(data)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(kind.as_str())
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(kind, key));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, kind: RecordKind, key: &str) -> Result<Option<T>> {
        let row = sqlx::query("SELECT data FROM records WHERE kind = ? AND key = ?")
            .bind(kind.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => {
                let data: String = row.try_get("data").map_err(db_error)?;
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn list<T: DeserializeOwned>(&self, kind: RecordKind) -> Result<Vec<T>> {
        let rows = sqlx::query("SELECT key, data FROM records WHERE kind = ? ORDER BY key")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("key").map_err(db_error)?;
            let data: String = row.try_get("data").map_err(db_error)?;
            match serde_json::from_str(&data) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping unreadable {} record '{}': {}", kind, key, e),
            }
        }
        Ok(items)
    }

    async fn remove(&self, kind: RecordKind, key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM records WHERE kind = ? AND key = ?")
            .bind(kind.as_str())
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(kind, key));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // === Exercise operations ===

    async fn create_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.insert(RecordKind::Exercise, &exercise.name, exercise).await
    }

    async fn load_exercise(&self, name: &str) -> Result<Option<Exercise>> {
        self.get(RecordKind::Exercise, name).await
    }

    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        let all: Vec<Exercise> = self.list(RecordKind::Exercise).await?;
        Ok(all.into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn delete_exercise(&self, name: &str) -> Result<()> {
        self.remove(RecordKind::Exercise, name).await
    }

    // === Routine operations ===

    async fn create_routine(&self, routine: &Routine) -> Result<()> {
        self.insert(RecordKind::Routine, &routine.name, routine).await
    }

    async fn load_routine(&self, name: &str) -> Result<Option<Routine>> {
        self.get(RecordKind::Routine, name).await
    }

    async fn list_routines(&self) -> Result<Vec<Routine>> {
        self.list(RecordKind::Routine).await
    }

    async fn append_routine_entry(&self, routine: &str, entry: &RoutineEntry) -> Result<Routine> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row = sqlx::query("SELECT data FROM records WHERE kind = ? AND key = ?")
            .bind(RecordKind::Routine.as_str())
            .bind(routine)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        let Some(row) = row else {
            return Err(StorageError::not_found(RecordKind::Routine, routine));
        };

        let data: String = row.try_get("data").map_err(db_error)?;
        let mut loaded: Routine = serde_json::from_str(&data)?;
        loaded.entries.push(entry.clone());

        sqlx::query("UPDATE records SET data = ?, updated_at = ? WHERE kind = ? AND key = ?")
            .bind(serde_json::to_string(&loaded)?)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(RecordKind::Routine.as_str())
            .bind(routine)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(loaded)
    }

    async fn delete_routine(&self, name: &str) -> Result<()> {
        self.remove(RecordKind::Routine, name).await
    }

    // === Goal operations ===

    async fn create_goal(&self, goal: &Goal) -> Result<()> {
        self.insert(RecordKind::Goal, &goal.exercise, goal).await
    }

    async fn update_goal(&self, goal: &Goal) -> Result<()> {
        self.replace(RecordKind::Goal, &goal.exercise, goal).await
    }

    async fn load_goal(&self, exercise: &str) -> Result<Option<Goal>> {
        self.get(RecordKind::Goal, exercise).await
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.list(RecordKind::Goal).await
    }

    async fn delete_goal(&self, exercise: &str) -> Result<()> {
        self.remove(RecordKind::Goal, exercise).await
    }
}

fn db_error(e: sqlx::Error) -> StorageError {
    StorageError::Other(e.to_string())
}
