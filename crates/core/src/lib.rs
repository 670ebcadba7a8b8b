//! FitTrack core data models.
//!
//! This crate defines the records kept by the tracker (exercises, routines
//! and goals) and the ephemeral snapshot of completed work that progress
//! reports are computed from.

#![warn(missing_docs)]

// Validation
mod error;

// Catalog and routines
mod exercise;
mod routine;

// Goals and progress input
mod goal;
mod snapshot;

// Re-exports
pub use error::ValidationError;
pub use exercise::{Exercise, ExerciseFilter, MuscleGroup, NewExercise};
pub use routine::{Routine, RoutineEntry};
pub use goal::{Goal, GoalType};
pub use snapshot::CompletedSnapshot;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
