//! Storage layer for the shared habit data
//!
//! The app and the widget process read and write the same durable key-value
//! namespace. Each side always reads both collections wholesale and writes
//! both back wholesale, so concurrent writers resolve as
//! "last full-snapshot write wins".

pub mod codec;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Habit, HabitLog};

/// Key holding the encoded array of habits
pub const HABITS_KEY: &str = "habits";
/// Key holding the encoded array of habit logs
pub const HABIT_LOGS_KEY: &str = "habitLogs";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Both collections as read from durable storage at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
}

/// The durable namespace shared by the app and the widget process
pub trait SharedStorage {
    /// Read both collections from the same snapshot
    ///
    /// Undecodable data degrades to empty collections; only failures to reach
    /// the store itself are errors.
    fn load(&self) -> Result<Snapshot, StorageError>;

    /// Replace both collections in a single write
    fn save(&self, habits: &[Habit], logs: &[HabitLog]) -> Result<(), StorageError>;

    /// Flush pending writes so another process sees them (and vice versa)
    fn synchronize(&self) -> Result<(), StorageError>;
}
