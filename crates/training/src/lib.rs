//! Training management (catalog, routines and goals).
//!
//! Validation and uniqueness policy on top of the raw record store.

#![warn(missing_docs)]

pub mod manager;

pub use manager::{BasicTrainingManager, GoalChange, TrainingError, TrainingManager};
