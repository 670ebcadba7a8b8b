//! Storage trait abstraction.

use async_trait::async_trait;
use fittrack_core::{Exercise, ExerciseFilter, Goal, Routine, RoutineEntry};
use crate::record::RecordKind;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// Record kind
        kind: RecordKind,
        /// Record key
        key: String,
    },

    /// A record with the same key already exists
    #[error("{kind} '{key}' already exists")]
    Duplicate {
        /// Record kind
        kind: RecordKind,
        /// Record key
        key: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    pub(crate) fn not_found(kind: RecordKind, key: &str) -> Self {
        StorageError::NotFound { kind, key: key.to_string() }
    }

    pub(crate) fn duplicate(kind: RecordKind, key: &str) -> Self {
        StorageError::Duplicate { kind, key: key.to_string() }
    }

    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Storage abstraction for FitTrack data.
///
/// Each mutating call is its own unit of work: it is applied completely or
/// not at all. Listing methods return records ordered by key.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Exercise operations ===

    /// Add an exercise to the catalog. Fails with `Duplicate` if the name is taken.
    async fn create_exercise(&self, exercise: &Exercise) -> Result<()>;

    /// Load an exercise by name.
    async fn load_exercise(&self, name: &str) -> Result<Option<Exercise>>;

    /// List exercises matching the filter.
    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>>;

    /// Delete an exercise.
    async fn delete_exercise(&self, name: &str) -> Result<()>;

    // === Routine operations ===

    /// Create a routine. Fails with `Duplicate` if the name is taken.
    async fn create_routine(&self, routine: &Routine) -> Result<()>;

    /// Load a routine by name.
    async fn load_routine(&self, name: &str) -> Result<Option<Routine>>;

    /// List all routines.
    async fn list_routines(&self) -> Result<Vec<Routine>>;

    /// Append an entry to an existing routine and return the updated routine.
    async fn append_routine_entry(&self, routine: &str, entry: &RoutineEntry) -> Result<Routine>;

    /// Delete a routine.
    async fn delete_routine(&self, name: &str) -> Result<()>;

    // === Goal operations ===

    /// Create a goal. Fails with `Duplicate` if the exercise already has one.
    async fn create_goal(&self, goal: &Goal) -> Result<()>;

    /// Replace an existing goal. Fails with `NotFound` if there is none.
    async fn update_goal(&self, goal: &Goal) -> Result<()>;

    /// Load the goal for an exercise.
    async fn load_goal(&self, exercise: &str) -> Result<Option<Goal>>;

    /// List all goals.
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Delete the goal for an exercise.
    async fn delete_goal(&self, exercise: &str) -> Result<()>;
}
