//! Domain module containing the habit/log data model and its rules
//!
//! This module defines the core entities (Habit, HabitLog), the check-in state
//! machine and the derived streak statistics. Both the app-side store and the
//! widget process build on these.

pub mod checkin;
pub mod habit;
pub mod habit_log;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use checkin::*;
pub use habit::*;
pub use habit_log::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid emoji: {0}")]
    InvalidEmoji(String),

    #[error("Invalid max check-in count: {0}")]
    InvalidMaxCheckInCount(String),

    #[error("Unknown habit type '{0}' (expected Checkbox or Count)")]
    UnknownHabitType(String),

    #[error("Unknown color theme '{0}'")]
    UnknownColorTheme(String),
}
