//! Progress tracking service.

use std::sync::Arc;
use async_trait::async_trait;
use fittrack_core::{CompletedSnapshot, Goal};
use fittrack_storage::Storage;
use serde::Serialize;
use tracing::debug;
use crate::engine::{self, GoalReport, ProgressError, RoutineReport};

/// Result of asking for progress towards an exercise goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GoalOutcome {
    /// No goal is stored for the exercise
    NoGoal {
        /// Exercise asked about
        exercise: String,
    },
    /// The goal exists and progress was computed
    Progress(GoalReport),
}

/// Progress tracking service.
///
/// Reads targets and goals from storage and never writes.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Look up the goal for an exercise.
    async fn goal(&self, exercise: &str) -> Result<Option<Goal>, ProgressError>;

    /// Progress towards an exercise's goal.
    async fn goal_progress(
        &self,
        exercise: &str,
        completed_reps: u32,
    ) -> Result<GoalOutcome, ProgressError>;

    /// Progress of a stored routine against what was completed.
    async fn routine_progress(
        &self,
        routine: &str,
        completed: &CompletedSnapshot,
    ) -> Result<RoutineReport, ProgressError>;
}

/// Basic progress tracker implementation.
#[derive(Clone)]
pub struct BasicProgressTracker {
    storage: Arc<dyn Storage>,
}

impl BasicProgressTracker {
    /// Create a new progress tracker.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ProgressTracker for BasicProgressTracker {
    async fn goal(&self, exercise: &str) -> Result<Option<Goal>, ProgressError> {
        Ok(self.storage.load_goal(exercise).await?)
    }

    async fn goal_progress(
        &self,
        exercise: &str,
        completed_reps: u32,
    ) -> Result<GoalOutcome, ProgressError> {
        let Some(goal) = self.goal(exercise).await? else {
            debug!("No goal set for {}", exercise);
            return Ok(GoalOutcome::NoGoal { exercise: exercise.to_string() });
        };
        Ok(GoalOutcome::Progress(engine::goal_progress(&goal, completed_reps)?))
    }

    async fn routine_progress(
        &self,
        routine: &str,
        completed: &CompletedSnapshot,
    ) -> Result<RoutineReport, ProgressError> {
        let Some(loaded) = self.storage.load_routine(routine).await? else {
            return Err(ProgressError::RoutineNotFound(routine.to_string()));
        };
        let targets = engine::targets_for(&loaded);
        debug!("Computing progress for routine {} ({} exercises)", routine, targets.len());
        engine::routine_progress(&targets, completed)
    }
}
