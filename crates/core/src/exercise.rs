//! Exercise model - catalog entries with their default rep/set targets.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::Time;

/// An exercise definition kept in the catalog.
///
/// Exercises are immutable once created; changing one means deleting it
/// and adding it again. Routines copy the fields they need at assembly
/// time, so deleting or recreating an exercise never touches a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique name, used as the catalog key
    pub name: String,

    /// Primary muscle group
    pub muscle_group: MuscleGroup,

    /// Target reps per set
    pub target_reps: u32,

    /// Target number of sets
    pub target_sets: u32,

    /// When created
    pub created_at: Time,
}

impl Exercise {
    /// Build an exercise from user input, trimming the name.
    pub fn new(input: NewExercise) -> Result<Self, ValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName("exercise"));
        }

        Ok(Self {
            name: name.to_string(),
            muscle_group: input.muscle_group,
            target_reps: input.target_reps,
            target_sets: input.target_sets,
            created_at: chrono::Utc::now(),
        })
    }
}

/// Fields needed to add an exercise to the catalog.
#[derive(Debug, Clone)]
pub struct NewExercise {
    /// Exercise name, trimmed on creation
    pub name: String,
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Target reps per set
    pub target_reps: u32,
    /// Target number of sets
    pub target_sets: u32,
}

/// The fixed set of muscle groups an exercise can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    /// Abs and lower back
    Core,
    /// Chest
    Chest,
    /// Shoulders
    Shoulders,
    /// Legs and glutes
    Legs,
    /// Upper back
    Back,
    /// Biceps
    Biceps,
    /// Triceps
    Triceps,
    /// Conditioning work
    Cardio,
}

impl MuscleGroup {
    /// Every group, in menu order.
    pub const ALL: [MuscleGroup; 8] = [
        MuscleGroup::Core,
        MuscleGroup::Chest,
        MuscleGroup::Shoulders,
        MuscleGroup::Legs,
        MuscleGroup::Back,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Cardio,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Core => "core",
            MuscleGroup::Chest => "chest",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Back => "back",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Cardio => "cardio",
        }
    }

    /// Comma-separated list of all group names.
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(|g| g.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MuscleGroup {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| ValidationError::MuscleGroup {
                input: s.trim().to_string(),
                options: Self::options(),
            })
    }
}

/// Filter for catalog queries.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Only exercises targeting this group
    pub muscle_group: Option<MuscleGroup>,
}

impl ExerciseFilter {
    /// Filter matching a single muscle group.
    pub fn muscle_group(group: MuscleGroup) -> Self {
        Self { muscle_group: Some(group) }
    }

    /// Whether the exercise passes this filter.
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.muscle_group
            .map_or(true, |group| exercise.muscle_group == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_exercise(name: &str) -> NewExercise {
        NewExercise {
            name: name.to_string(),
            muscle_group: MuscleGroup::Legs,
            target_reps: 10,
            target_sets: 3,
        }
    }

    #[test]
    fn test_exercise_name_is_trimmed() {
        let exercise = Exercise::new(new_exercise("  Squat ")).unwrap();
        assert_eq!(exercise.name, "Squat");
        assert_eq!(exercise.target_reps, 10);
        assert_eq!(exercise.target_sets, 3);
    }

    #[test]
    fn test_blank_exercise_name_rejected() {
        let err = Exercise::new(new_exercise("   ")).unwrap_err();
        assert_eq!(err, ValidationError::BlankName("exercise"));
    }

    #[test]
    fn test_muscle_group_parse_is_case_insensitive() {
        assert_eq!("Chest".parse::<MuscleGroup>().unwrap(), MuscleGroup::Chest);
        assert_eq!(" TRICEPS ".parse::<MuscleGroup>().unwrap(), MuscleGroup::Triceps);
    }

    #[test]
    fn test_unknown_muscle_group_lists_options() {
        let err = "glutes".parse::<MuscleGroup>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("glutes"));
        assert!(message.contains("core, chest, shoulders, legs, back, biceps, triceps, cardio"));
    }

    #[test]
    fn test_muscle_group_serializes_lowercase() {
        let json = serde_json::to_string(&MuscleGroup::Shoulders).unwrap();
        assert_eq!(json, "\"shoulders\"");
    }

    #[test]
    fn test_filter_matches() {
        let squat = Exercise::new(new_exercise("Squat")).unwrap();
        assert!(ExerciseFilter::default().matches(&squat));
        assert!(ExerciseFilter::muscle_group(MuscleGroup::Legs).matches(&squat));
        assert!(!ExerciseFilter::muscle_group(MuscleGroup::Back).matches(&squat));
    }
}
