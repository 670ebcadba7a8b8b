//! Progress tracking.
//!
//! Pure progress arithmetic (goal completion, remaining-set estimates and
//! whole-routine completion) plus a tracker that feeds it from storage.

#![warn(missing_docs)]

pub mod engine;
pub mod estimator;
pub mod tracker;

pub use engine::{
    goal_progress, overall_completion, routine_progress, targets_for, Divisor, ExerciseReport,
    GoalReport, Overall, ProgressError, RoutineReport, Target, Targets,
};
pub use estimator::remaining_sets;
pub use tracker::{BasicProgressTracker, GoalOutcome, ProgressTracker};
