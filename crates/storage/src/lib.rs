//! Storage abstraction and implementations for FitTrack.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! implementation and an optional SQLite implementation. Both keep every
//! record as a tagged envelope (kind + key) in one uniform collection.

#![warn(missing_docs)]

pub mod trait_;
pub mod record;
pub mod json_storage;
#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use trait_::{Storage, StorageError, Result};
pub use record::RecordKind;
pub use json_storage::JsonStorage;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;
