//! Training management service.

use std::sync::Arc;
use async_trait::async_trait;
use fittrack_core::{
    Exercise, ExerciseFilter, Goal, GoalType, MuscleGroup, NewExercise, Routine, RoutineEntry,
    ValidationError,
};
use fittrack_storage::{Storage, StorageError};
use tracing::{debug, info, warn};

/// Errors from training management operations.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Exercise is not in the catalog
    #[error("exercise '{0}' not found in the catalog")]
    ExerciseNotFound(String),

    /// Routine does not exist
    #[error("routine '{0}' not found")]
    RoutineNotFound(String),

    /// Exercise has no goal
    #[error("no goal set for '{0}'")]
    GoalNotFound(String),

    /// A goal exists and overwriting was not allowed
    #[error("a goal for '{exercise}' is already set ({goal_type}: {goal_value})")]
    GoalExists {
        /// Exercise name
        exercise: String,
        /// Existing goal type
        goal_type: GoalType,
        /// Existing goal value
        goal_value: u32,
    },

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What `set_goal` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalChange {
    /// A new goal was stored
    Created(Goal),
    /// The existing goal's value was replaced
    Updated {
        /// Value before the update
        previous: u32,
        /// Goal as stored now
        goal: Goal,
    },
    /// A value of zero was given; nothing was stored
    Skipped,
}

/// Training management service.
#[async_trait]
pub trait TrainingManager: Send + Sync {
    /// Add an exercise to the catalog.
    async fn add_exercise(&self, input: NewExercise) -> Result<Exercise, TrainingError>;

    /// List catalog exercises matching the filter.
    async fn exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, TrainingError>;

    /// Muscle groups that at least one exercise targets, in menu order.
    async fn muscle_groups_in_use(&self) -> Result<Vec<MuscleGroup>, TrainingError>;

    /// Remove an exercise from the catalog.
    ///
    /// Routines keep their copies and goals keep their value.
    async fn delete_exercise(&self, name: &str) -> Result<(), TrainingError>;

    /// Create an empty routine. A blank name gets a generated one.
    async fn create_routine(&self, name: &str) -> Result<Routine, TrainingError>;

    /// Copy a catalog exercise (matched case-insensitively) into a routine.
    async fn add_to_routine(
        &self,
        routine: &str,
        exercise: &str,
    ) -> Result<RoutineEntry, TrainingError>;

    /// List all routines.
    async fn routines(&self) -> Result<Vec<Routine>, TrainingError>;

    /// Load one routine.
    async fn routine(&self, name: &str) -> Result<Routine, TrainingError>;

    /// Delete a routine.
    async fn delete_routine(&self, name: &str) -> Result<(), TrainingError>;

    /// Set the rep goal for an exercise.
    ///
    /// A value of zero skips. An existing goal is updated in place when
    /// `overwrite` is set and reported as a conflict otherwise.
    async fn set_goal(
        &self,
        exercise: &str,
        value: u32,
        overwrite: bool,
    ) -> Result<GoalChange, TrainingError>;

    /// List all goals.
    async fn goals(&self) -> Result<Vec<Goal>, TrainingError>;

    /// Delete the goal for an exercise.
    async fn delete_goal(&self, exercise: &str) -> Result<(), TrainingError>;
}

/// Training manager backed by a [`Storage`].
#[derive(Clone)]
pub struct BasicTrainingManager {
    storage: Arc<dyn Storage>,
}

impl BasicTrainingManager {
    /// Create a new training manager.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn find_exercise(&self, query: &str) -> Result<Option<Exercise>, TrainingError> {
        let query = query.trim();
        if let Some(exact) = self.storage.load_exercise(query).await? {
            return Ok(Some(exact));
        }
        let wanted = query.to_lowercase();
        let all = self.storage.list_exercises(&ExerciseFilter::default()).await?;
        Ok(all.into_iter().find(|e| e.name.to_lowercase() == wanted))
    }

    /// Index for the next `Routine_<n>`: one past the routine count, bumped
    /// until the name is free.
    async fn next_generated_index(&self) -> Result<usize, TrainingError> {
        let existing = self.storage.list_routines().await?;
        let mut n = existing.len() + 1;
        while existing.iter().any(|r| r.name == Routine::generated_name(n)) {
            n += 1;
        }
        Ok(n)
    }
}

fn not_found(err: StorageError, mapped: TrainingError) -> TrainingError {
    if err.is_not_found() {
        mapped
    } else {
        TrainingError::Storage(err)
    }
}

#[async_trait]
impl TrainingManager for BasicTrainingManager {
    async fn add_exercise(&self, input: NewExercise) -> Result<Exercise, TrainingError> {
        let exercise = Exercise::new(input)?;
        self.storage.create_exercise(&exercise).await?;
        info!("Added exercise {} ({})", exercise.name, exercise.muscle_group);
        Ok(exercise)
    }

    async fn exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, TrainingError> {
        Ok(self.storage.list_exercises(filter).await?)
    }

    async fn muscle_groups_in_use(&self) -> Result<Vec<MuscleGroup>, TrainingError> {
        let all = self.storage.list_exercises(&ExerciseFilter::default()).await?;
        let mut groups: Vec<MuscleGroup> = all.iter().map(|e| e.muscle_group).collect();
        groups.sort();
        groups.dedup();
        Ok(groups)
    }

    async fn delete_exercise(&self, name: &str) -> Result<(), TrainingError> {
        self.storage
            .delete_exercise(name)
            .await
            .map_err(|e| not_found(e, TrainingError::ExerciseNotFound(name.to_string())))?;
        info!("Deleted exercise {}", name);
        Ok(())
    }

    async fn create_routine(&self, name: &str) -> Result<Routine, TrainingError> {
        let routine = if name.trim().is_empty() {
            let routine = Routine::generated(self.next_generated_index().await?);
            debug!("No routine name given, generated {}", routine.name);
            routine
        } else {
            Routine::new(name)?
        };
        self.storage.create_routine(&routine).await?;
        info!("Created routine {}", routine.name);
        Ok(routine)
    }

    async fn add_to_routine(
        &self,
        routine: &str,
        exercise: &str,
    ) -> Result<RoutineEntry, TrainingError> {
        let Some(found) = self.find_exercise(exercise).await? else {
            warn!("Exercise {} not in catalog, not added to {}", exercise, routine);
            return Err(TrainingError::ExerciseNotFound(exercise.trim().to_string()));
        };
        let entry = RoutineEntry::from(&found);
        self.storage
            .append_routine_entry(routine, &entry)
            .await
            .map_err(|e| not_found(e, TrainingError::RoutineNotFound(routine.to_string())))?;
        info!("Added {} to routine {}", entry.exercise, routine);
        Ok(entry)
    }

    async fn routines(&self) -> Result<Vec<Routine>, TrainingError> {
        Ok(self.storage.list_routines().await?)
    }

    async fn routine(&self, name: &str) -> Result<Routine, TrainingError> {
        self.storage
            .load_routine(name)
            .await?
            .ok_or_else(|| TrainingError::RoutineNotFound(name.to_string()))
    }

    async fn delete_routine(&self, name: &str) -> Result<(), TrainingError> {
        self.storage
            .delete_routine(name)
            .await
            .map_err(|e| not_found(e, TrainingError::RoutineNotFound(name.to_string())))?;
        info!("Deleted routine {}", name);
        Ok(())
    }

    async fn set_goal(
        &self,
        exercise: &str,
        value: u32,
        overwrite: bool,
    ) -> Result<GoalChange, TrainingError> {
        if value == 0 {
            debug!("Goal value 0 for {}, skipping", exercise);
            return Ok(GoalChange::Skipped);
        }
        if self.storage.load_exercise(exercise).await?.is_none() {
            return Err(TrainingError::ExerciseNotFound(exercise.to_string()));
        }

        match self.storage.load_goal(exercise).await? {
            Some(mut goal) if overwrite => {
                let previous = goal.goal_value;
                goal.set_value(value)?;
                self.storage.update_goal(&goal).await?;
                info!("Updated goal for {}: {} -> {}", exercise, previous, value);
                Ok(GoalChange::Updated { previous, goal })
            }
            Some(goal) => {
                warn!("Goal for {} already set and overwrite disabled", exercise);
                Err(TrainingError::GoalExists {
                    exercise: goal.exercise,
                    goal_type: goal.goal_type,
                    goal_value: goal.goal_value,
                })
            }
            None => {
                let goal = Goal::reps(exercise, value)?;
                self.storage.create_goal(&goal).await?;
                info!("Set goal for {}: {} reps", exercise, value);
                Ok(GoalChange::Created(goal))
            }
        }
    }

    async fn goals(&self) -> Result<Vec<Goal>, TrainingError> {
        Ok(self.storage.list_goals().await?)
    }

    async fn delete_goal(&self, exercise: &str) -> Result<(), TrainingError> {
        self.storage
            .delete_goal(exercise)
            .await
            .map_err(|e| not_found(e, TrainingError::GoalNotFound(exercise.to_string())))?;
        info!("Deleted goal for {}", exercise);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_storage::JsonStorage;

    async fn setup() -> (tempfile::TempDir, BasicTrainingManager) {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(JsonStorage::new(dir.path()).await.unwrap());
        (dir, BasicTrainingManager::new(storage))
    }

    fn new_exercise(name: &str, group: MuscleGroup) -> NewExercise {
        NewExercise {
            name: name.to_string(),
            muscle_group: group,
            target_reps: 10,
            target_sets: 3,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_exercises() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Squat", MuscleGroup::Legs)).await.unwrap();
        manager.add_exercise(new_exercise("Bench", MuscleGroup::Chest)).await.unwrap();

        let all = manager.exercises(&ExerciseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let groups = manager.muscle_groups_in_use().await.unwrap();
        assert_eq!(groups, vec![MuscleGroup::Chest, MuscleGroup::Legs]);
    }

    #[tokio::test]
    async fn test_duplicate_exercise_rejected() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Squat", MuscleGroup::Legs)).await.unwrap();
        let err = manager
            .add_exercise(new_exercise("Squat", MuscleGroup::Legs))
            .await
            .unwrap_err();
        assert!(matches!(err, TrainingError::Storage(StorageError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_add_then_delete_round_trip() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Squat", MuscleGroup::Legs)).await.unwrap();
        let before = manager.exercises(&ExerciseFilter::default()).await.unwrap();

        manager.add_exercise(new_exercise("Row", MuscleGroup::Back)).await.unwrap();
        manager.delete_exercise("Row").await.unwrap();

        assert_eq!(manager.exercises(&ExerciseFilter::default()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_missing_exercise() {
        let (_dir, manager) = setup().await;
        let err = manager.delete_exercise("Ghost").await.unwrap_err();
        assert!(matches!(err, TrainingError::ExerciseNotFound(name) if name == "Ghost"));
    }

    #[tokio::test]
    async fn test_generated_routine_names() {
        let (_dir, manager) = setup().await;
        let first = manager.create_routine("").await.unwrap();
        assert_eq!(first.name, "Routine_1");
        manager.create_routine("Push").await.unwrap();
        let third = manager.create_routine("  ").await.unwrap();
        assert_eq!(third.name, "Routine_3");
    }

    #[tokio::test]
    async fn test_generated_name_skips_taken() {
        let (_dir, manager) = setup().await;
        manager.create_routine("").await.unwrap();
        manager.create_routine("").await.unwrap();
        manager.delete_routine("Routine_1").await.unwrap();

        // One routine left, so the candidate is Routine_2, which is taken
        let next = manager.create_routine("").await.unwrap();
        assert_eq!(next.name, "Routine_3");
    }

    #[tokio::test]
    async fn test_invalid_routine_name() {
        let (_dir, manager) = setup().await;
        let err = manager.create_routine("leg day").await.unwrap_err();
        assert!(matches!(err, TrainingError::Validation(ValidationError::RoutineName(_))));
        assert!(manager.routines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_routine_is_case_insensitive_snapshot() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Squat", MuscleGroup::Legs)).await.unwrap();
        manager.create_routine("Legs").await.unwrap();

        let entry = manager.add_to_routine("Legs", "squat").await.unwrap();
        assert_eq!(entry.exercise, "Squat");

        manager.delete_exercise("Squat").await.unwrap();
        let routine = manager.routine("Legs").await.unwrap();
        assert_eq!(routine.entries.len(), 1);
        assert_eq!(routine.entries[0].target_reps, 10);
    }

    #[tokio::test]
    async fn test_add_unknown_exercise_to_routine() {
        let (_dir, manager) = setup().await;
        manager.create_routine("Legs").await.unwrap();
        let err = manager.add_to_routine("Legs", "Ghost").await.unwrap_err();
        assert!(matches!(err, TrainingError::ExerciseNotFound(_)));
        assert!(manager.routine("Legs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_exercise_names() {
        let (_dir, manager) = setup().await;
        let long = "Single Leg Romanian Deadlift ".repeat(6);
        let added = manager.add_exercise(new_exercise(&long, MuscleGroup::Legs)).await.unwrap();
        manager.create_routine("Legs").await.unwrap();

        let entry = manager.add_to_routine("Legs", &added.name.to_uppercase()).await.unwrap();
        assert_eq!(entry.exercise, added.name);

        let unknown = "z".repeat(200);
        let err = manager.add_to_routine("Legs", &unknown).await.unwrap_err();
        assert!(matches!(err, TrainingError::ExerciseNotFound(name) if name == unknown));
    }

    #[tokio::test]
    async fn test_add_to_missing_routine() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Squat", MuscleGroup::Legs)).await.unwrap();
        let err = manager.add_to_routine("Nope", "Squat").await.unwrap_err();
        assert!(matches!(err, TrainingError::RoutineNotFound(_)));
    }

    #[tokio::test]
    async fn test_goal_set_then_update_keeps_one_record() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Pull Up", MuscleGroup::Back)).await.unwrap();

        let created = manager.set_goal("Pull Up", 50, true).await.unwrap();
        assert!(matches!(created, GoalChange::Created(_)));

        let updated = manager.set_goal("Pull Up", 80, true).await.unwrap();
        match updated {
            GoalChange::Updated { previous, goal } => {
                assert_eq!(previous, 50);
                assert_eq!(goal.goal_value, 80);
            }
            other => panic!("expected update, got {:?}", other),
        }

        let goals = manager.goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal_value, 80);
    }

    #[tokio::test]
    async fn test_goal_without_overwrite_conflicts() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Pull Up", MuscleGroup::Back)).await.unwrap();
        manager.set_goal("Pull Up", 50, false).await.unwrap();

        let err = manager.set_goal("Pull Up", 80, false).await.unwrap_err();
        assert!(matches!(err, TrainingError::GoalExists { goal_value: 50, .. }));
        assert_eq!(manager.goals().await.unwrap()[0].goal_value, 50);
    }

    #[tokio::test]
    async fn test_zero_goal_is_skipped() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Pull Up", MuscleGroup::Back)).await.unwrap();
        assert_eq!(manager.set_goal("Pull Up", 0, true).await.unwrap(), GoalChange::Skipped);
        assert!(manager.goals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_goal_requires_catalog_exercise() {
        let (_dir, manager) = setup().await;
        let err = manager.set_goal("Ghost", 10, true).await.unwrap_err();
        assert!(matches!(err, TrainingError::ExerciseNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_goal() {
        let (_dir, manager) = setup().await;
        manager.add_exercise(new_exercise("Pull Up", MuscleGroup::Back)).await.unwrap();
        manager.set_goal("Pull Up", 50, true).await.unwrap();

        manager.delete_goal("Pull Up").await.unwrap();
        assert!(manager.goals().await.unwrap().is_empty());
        let err = manager.delete_goal("Pull Up").await.unwrap_err();
        assert!(matches!(err, TrainingError::GoalNotFound(_)));
    }
}
