//! Routine model - named, ordered collections of exercise snapshots.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::exercise::{Exercise, MuscleGroup};
use crate::Time;

/// A workout routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Unique routine name
    pub name: String,

    /// Entries in the order they were added
    pub entries: Vec<RoutineEntry>,

    /// When created
    pub created_at: Time,
}

impl Routine {
    /// Create an empty routine with a user-chosen name.
    ///
    /// Names are restricted to alphanumeric characters.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName("routine"));
        }
        if !name.chars().all(char::is_alphanumeric) {
            return Err(ValidationError::RoutineName(name.to_string()));
        }
        Ok(Self::unchecked(name.to_string()))
    }

    /// Create an empty routine named `Routine_<n>`.
    pub fn generated(n: usize) -> Self {
        Self::unchecked(Self::generated_name(n))
    }

    /// The name given to the `n`th unnamed routine.
    pub fn generated_name(n: usize) -> String {
        format!("Routine_{}", n)
    }

    fn unchecked(name: String) -> Self {
        Self {
            name,
            entries: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Append a snapshot of the exercise.
    pub fn push(&mut self, exercise: &Exercise) {
        self.entries.push(RoutineEntry::from(exercise));
    }

    /// Distinct exercise names in first-seen order.
    pub fn exercise_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.exercise.as_str()) {
                names.push(&entry.exercise);
            }
        }
        names
    }

    /// Whether the routine has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Copy of an exercise's targets taken when it was added to a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineEntry {
    /// Exercise name at the time of the copy
    pub exercise: String,

    /// Muscle group at the time of the copy
    pub muscle_group: MuscleGroup,

    /// Target reps per set
    pub target_reps: u32,

    /// Target sets
    pub target_sets: u32,
}

impl From<&Exercise> for RoutineEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            exercise: exercise.name.clone(),
            muscle_group: exercise.muscle_group,
            target_reps: exercise.target_reps,
            target_sets: exercise.target_sets,
        }
    }
}
