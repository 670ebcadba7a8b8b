//! Validation errors raised while building records from user input.

/// A value supplied for a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A name was empty after trimming whitespace
    #[error("{0} name must not be empty")]
    BlankName(&'static str),

    /// Routine names are restricted to letters and digits
    #[error("invalid routine name '{0}': use alphanumeric characters only")]
    RoutineName(String),

    /// Muscle group text did not match any known category
    #[error("unknown muscle group '{input}', choose from: {options}")]
    MuscleGroup {
        /// What was entered
        input: String,
        /// Comma-separated list of accepted values
        options: String,
    },

    /// Goals must target at least one rep
    #[error("goal value must be greater than zero")]
    ZeroGoal,
}
