//! Goal model - a standalone rep target for one exercise.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::Time;

/// A goal for a single exercise.
///
/// Goals reference exercises by name only; at most one goal exists per
/// exercise name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Exercise name, used as the goal key
    pub exercise: String,

    /// What the goal counts
    pub goal_type: GoalType,

    /// Target value, always greater than zero
    pub goal_value: u32,

    /// Last updated
    pub updated_at: Time,
}

impl Goal {
    /// Create a rep goal.
    pub fn reps(exercise: impl Into<String>, goal_value: u32) -> Result<Self, ValidationError> {
        if goal_value == 0 {
            return Err(ValidationError::ZeroGoal);
        }
        Ok(Self {
            exercise: exercise.into(),
            goal_type: GoalType::Reps,
            goal_value,
            updated_at: chrono::Utc::now(),
        })
    }

    /// Replace the target value, keeping the goal's identity.
    pub fn set_value(&mut self, goal_value: u32) -> Result<(), ValidationError> {
        if goal_value == 0 {
            return Err(ValidationError::ZeroGoal);
        }
        self.goal_value = goal_value;
        self.updated_at = chrono::Utc::now();
        Ok(())
    }
}

/// Goal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Total reps
    Reps,
}

impl GoalType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Reps => "reps",
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
