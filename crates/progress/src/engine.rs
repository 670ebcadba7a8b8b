//! Progress arithmetic.
//!
//! Everything here is pure: callers pass targets and a snapshot of completed
//! reps and get figures back. Percentages are rounded to two decimals and
//! never clamped, so over-achievement shows up as values above 100 and as
//! negative remaining reps.

use std::collections::BTreeMap;
use fittrack_core::{CompletedSnapshot, Goal, GoalType, Routine};
use fittrack_storage::StorageError;
use serde::Serialize;
use tracing::warn;
use crate::estimator::remaining_sets;

/// Errors raised while computing progress.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// A target of zero would be used as a divisor
    #[error("cannot compute progress for '{exercise}': {divisor} is zero")]
    DivisionGuard {
        /// Exercise whose targets are zero
        exercise: String,
        /// Which value was zero
        divisor: Divisor,
    },

    /// The routine does not exist
    #[error("routine '{0}' not found")]
    RoutineNotFound(String),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The value a progress figure would have divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Divisor {
    /// Goal value of a single-exercise goal
    GoalValue,
    /// Target reps per set
    TargetReps,
    /// Target sets times target reps
    TotalReps,
}

impl std::fmt::Display for Divisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Divisor::GoalValue => "goal value",
            Divisor::TargetReps => "target reps",
            Divisor::TotalReps => "target sets x reps",
        })
    }
}

/// Rep and set targets for one exercise of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Reps per set
    pub reps: u32,
    /// Sets
    pub sets: u32,
}

/// Targets keyed by exercise name.
pub type Targets = BTreeMap<String, Target>;

/// Progress towards a single-exercise goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalReport {
    /// Exercise name
    pub exercise: String,
    /// Goal type
    pub goal_type: GoalType,
    /// Goal value
    pub goal_value: u32,
    /// Reps reported as done
    pub completed_reps: u32,
    /// Reps still to do; negative once the goal is exceeded
    pub remaining_reps: i64,
    /// Completion, unclamped
    pub percentage: f64,
}

/// Progress of one exercise within a routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseReport {
    /// Exercise name
    pub exercise: String,
    /// Routine target for the exercise
    pub target: Target,
    /// Reps reported as done
    pub completed_reps: u32,
    /// Reps still to do; negative once exceeded
    pub remaining_reps: i64,
    /// Estimated sets still to do
    pub remaining_sets: u32,
    /// Completion against the per-set rep target, unclamped
    pub completion_percentage: f64,
}

/// Whole-routine completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Overall {
    /// Mean completion over the exercises with targets, as a percentage
    Completed(f64),
    /// No exercise had both a target and a completed count
    NoData,
}

/// Progress of a routine against its per-exercise targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineReport {
    /// Per-exercise figures, in snapshot order
    pub exercises: Vec<ExerciseReport>,
    /// Exercises in the snapshot that had no target and were left out
    pub skipped: Vec<String>,
    /// Aggregate completion
    pub overall: Overall,
}

impl RoutineReport {
    /// Figures for one exercise.
    pub fn get(&self, exercise: &str) -> Option<&ExerciseReport> {
        self.exercises.iter().find(|r| r.exercise == exercise)
    }
}

/// Round to two decimal places, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Compute progress towards a goal.
pub fn goal_progress(goal: &Goal, completed_reps: u32) -> Result<GoalReport, ProgressError> {
    if goal.goal_value == 0 {
        return Err(ProgressError::DivisionGuard {
            exercise: goal.exercise.clone(),
            divisor: Divisor::GoalValue,
        });
    }

    let remaining_reps = i64::from(goal.goal_value) - i64::from(completed_reps);
    let percentage = round2(f64::from(completed_reps) / f64::from(goal.goal_value) * 100.0);

    Ok(GoalReport {
        exercise: goal.exercise.clone(),
        goal_type: goal.goal_type,
        goal_value: goal.goal_value,
        completed_reps,
        remaining_reps,
        percentage,
    })
}

/// Build routine targets from its entries.
///
/// An exercise listed more than once takes the largest reps and the largest
/// sets among its entries.
pub fn targets_for(routine: &Routine) -> Targets {
    let mut targets = Targets::new();
    for entry in &routine.entries {
        targets
            .entry(entry.exercise.clone())
            .and_modify(|t: &mut Target| {
                t.reps = t.reps.max(entry.target_reps);
                t.sets = t.sets.max(entry.target_sets);
            })
            .or_insert(Target {
                reps: entry.target_reps,
                sets: entry.target_sets,
            });
    }
    targets
}

/// Compute per-exercise and overall progress of a routine.
///
/// Only exercises present in `completed` are reported. Those without a
/// target are skipped with a warning and excluded from the overall figure.
pub fn routine_progress(
    targets: &Targets,
    completed: &CompletedSnapshot,
) -> Result<RoutineReport, ProgressError> {
    let mut exercises = Vec::with_capacity(completed.len());
    let mut skipped = Vec::new();

    for (exercise, completed_reps) in completed.iter() {
        let Some(target) = targets.get(exercise) else {
            warn!("Missing target data for exercise {}, skipping", exercise);
            skipped.push(exercise.to_string());
            continue;
        };
        if target.reps == 0 {
            return Err(ProgressError::DivisionGuard {
                exercise: exercise.to_string(),
                divisor: Divisor::TargetReps,
            });
        }

        let remaining_reps = i64::from(target.reps) - i64::from(completed_reps);
        exercises.push(ExerciseReport {
            exercise: exercise.to_string(),
            target: *target,
            completed_reps,
            remaining_reps,
            remaining_sets: remaining_sets(remaining_reps, target.reps, target.sets),
            completion_percentage: round2(
                f64::from(completed_reps) / f64::from(target.reps) * 100.0,
            ),
        });
    }

    let overall = overall_completion(targets, completed)?;

    Ok(RoutineReport { exercises, skipped, overall })
}

/// Mean of `completed / (sets * reps)` over exercises with targets, as a
/// percentage rounded to two decimals.
pub fn overall_completion(
    targets: &Targets,
    completed: &CompletedSnapshot,
) -> Result<Overall, ProgressError> {
    let mut total_completion = 0.0;
    let mut total_exercises = 0usize;

    for (exercise, completed_reps) in completed.iter() {
        let Some(target) = targets.get(exercise) else {
            continue;
        };
        let total_reps = u64::from(target.sets) * u64::from(target.reps);
        if total_reps == 0 {
            return Err(ProgressError::DivisionGuard {
                exercise: exercise.to_string(),
                divisor: Divisor::TotalReps,
            });
        }
        total_completion += f64::from(completed_reps) / total_reps as f64;
        total_exercises += 1;
    }

    if total_exercises == 0 {
        return Ok(Overall::NoData);
    }
    Ok(Overall::Completed(round2(total_completion / total_exercises as f64 * 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_core::{Exercise, MuscleGroup, NewExercise};

    fn targets(items: &[(&str, u32, u32)]) -> Targets {
        items
            .iter()
            .map(|(name, reps, sets)| (name.to_string(), Target { reps: *reps, sets: *sets }))
            .collect()
    }

    fn snapshot(items: &[(&str, u32)]) -> CompletedSnapshot {
        items.iter().map(|(name, reps)| (*name, *reps)).collect()
    }

    fn goal(value: u32) -> Goal {
        Goal::reps("Pull Up", value).unwrap()
    }

    #[test]
    fn test_goal_progress_exact() {
        let report = goal_progress(&goal(40), 10).unwrap();
        assert_eq!(report.remaining_reps, 30);
        assert_eq!(report.percentage, 25.0);
        assert_eq!(report.goal_type, GoalType::Reps);
    }

    #[test]
    fn test_goal_progress_is_unclamped() {
        let report = goal_progress(&goal(100), 150).unwrap();
        assert_eq!(report.percentage, 150.0);
        assert_eq!(report.remaining_reps, -50);
    }

    #[test]
    fn test_goal_progress_rounds_to_two_decimals() {
        assert_eq!(goal_progress(&goal(3), 1).unwrap().percentage, 33.33);
        assert_eq!(goal_progress(&goal(3), 2).unwrap().percentage, 66.67);
        assert_eq!(goal_progress(&goal(7), 0).unwrap().percentage, 0.0);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        assert_eq!(goal_progress(&goal(32), 1).unwrap().percentage, 3.12);
        assert_eq!(goal_progress(&goal(32), 3).unwrap().percentage, 9.38);
        assert_eq!(goal_progress(&goal(8), 1).unwrap().percentage, 12.5);

        let overall = overall_completion(&targets(&[("Squat", 32, 1)]), &snapshot(&[("Squat", 1)]))
            .unwrap();
        assert_eq!(overall, Overall::Completed(3.12));
    }

    #[test]
    fn test_goal_progress_guards_zero_value() {
        let mut zero = goal(10);
        zero.goal_value = 0;
        let err = goal_progress(&zero, 5).unwrap_err();
        assert!(matches!(
            err,
            ProgressError::DivisionGuard { divisor: Divisor::GoalValue, .. }
        ));
    }

    #[test]
    fn test_target_met_leaves_no_sets() {
        let report = routine_progress(&targets(&[("Squat", 10, 3)]), &snapshot(&[("Squat", 10)]))
            .unwrap();
        let squat = report.get("Squat").unwrap();
        assert_eq!(squat.remaining_reps, 0);
        assert_eq!(squat.remaining_sets, 0);
        assert_eq!(squat.completion_percentage, 100.0);
    }

    #[test]
    fn test_partial_set_rounding() {
        let report = routine_progress(&targets(&[("Squat", 10, 3)]), &snapshot(&[("Squat", 4)]))
            .unwrap();
        let squat = report.get("Squat").unwrap();
        assert_eq!(squat.remaining_reps, 6);
        assert_eq!(squat.remaining_sets, 2);
        assert_eq!(squat.completion_percentage, 40.0);
    }

    #[test]
    fn test_exact_division_has_no_extra_set() {
        let report = routine_progress(
            &targets(&[("Squat", 10, 2), ("Dip", 5, 4)]),
            &snapshot(&[("Squat", 0), ("Dip", 0)]),
        )
        .unwrap();
        assert_eq!(report.get("Squat").unwrap().remaining_sets, 2);
        assert_eq!(report.get("Dip").unwrap().remaining_reps, 5);
        assert_eq!(report.get("Dip").unwrap().remaining_sets, 4);
    }

    #[test]
    fn test_over_achievement_is_unclamped() {
        let report = routine_progress(&targets(&[("Squat", 10, 3)]), &snapshot(&[("Squat", 25)]))
            .unwrap();
        let squat = report.get("Squat").unwrap();
        assert_eq!(squat.remaining_reps, -15);
        assert_eq!(squat.remaining_sets, 0);
        assert_eq!(squat.completion_percentage, 250.0);
    }

    #[test]
    fn test_zero_target_reps_is_guarded() {
        let err = routine_progress(&targets(&[("Plank", 0, 3)]), &snapshot(&[("Plank", 1)]))
            .unwrap_err();
        match err {
            ProgressError::DivisionGuard { exercise, divisor } => {
                assert_eq!(exercise, "Plank");
                assert_eq!(divisor, Divisor::TargetReps);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_target_sets_guards_overall() {
        let err = overall_completion(&targets(&[("Plank", 10, 0)]), &snapshot(&[("Plank", 1)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressError::DivisionGuard { divisor: Divisor::TotalReps, .. }
        ));
    }

    #[test]
    fn test_overall_is_mean_of_exercise_completion() {
        // 15 / 30 = 0.5 and 10 / 40 = 0.25, mean 0.375
        let overall = overall_completion(
            &targets(&[("Squat", 10, 3), ("Lunge", 10, 4)]),
            &snapshot(&[("Squat", 15), ("Lunge", 10)]),
        )
        .unwrap();
        assert_eq!(overall, Overall::Completed(37.5));
    }

    #[test]
    fn test_overall_rounds_to_two_decimals() {
        let overall = overall_completion(&targets(&[("Squat", 10, 3)]), &snapshot(&[("Squat", 1)]))
            .unwrap();
        assert_eq!(overall, Overall::Completed(3.33));
    }

    #[test]
    fn test_missing_target_is_skipped_everywhere() {
        let report = routine_progress(
            &targets(&[("Squat", 10, 3)]),
            &snapshot(&[("Squat", 30), ("Ghost", 100)]),
        )
        .unwrap();
        assert_eq!(report.exercises.len(), 1);
        assert_eq!(report.skipped, vec!["Ghost".to_string()]);
        // Only Squat counts: 30 / 30
        assert_eq!(report.overall, Overall::Completed(100.0));
    }

    #[test]
    fn test_no_data_when_snapshot_empty() {
        let report = routine_progress(&targets(&[("Squat", 10, 3)]), &CompletedSnapshot::new())
            .unwrap();
        assert!(report.exercises.is_empty());
        assert_eq!(report.overall, Overall::NoData);
    }

    #[test]
    fn test_no_data_when_every_exercise_skipped() {
        let report = routine_progress(&Targets::new(), &snapshot(&[("Ghost", 3)])).unwrap();
        assert_eq!(report.overall, Overall::NoData);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_report_keeps_snapshot_order() {
        let report = routine_progress(
            &targets(&[("A", 5, 1), ("B", 5, 1), ("C", 5, 1)]),
            &snapshot(&[("C", 1), ("A", 2), ("B", 3)]),
        )
        .unwrap();
        let order: Vec<_> = report.exercises.iter().map(|r| r.exercise.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_targets_take_max_of_duplicates() {
        let mut routine = Routine::new("Legs").unwrap();
        for (reps, sets) in [(8, 5), (12, 3)] {
            routine.push(
                &Exercise::new(NewExercise {
                    name: "Squat".to_string(),
                    muscle_group: MuscleGroup::Legs,
                    target_reps: reps,
                    target_sets: sets,
                })
                .unwrap(),
            );
        }

        let targets = targets_for(&routine);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets["Squat"], Target { reps: 12, sets: 5 });
    }
}
