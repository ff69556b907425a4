//! Core types and enums used throughout the domain layer
//!
//! This module defines the ID wrappers, the habit type and color theme enums,
//! and the calendar-day normalization shared by every date-keyed operation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a log ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single day's log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub Uuid);

impl LogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a habit is checked in
///
/// The persisted names ("Checkbox", "Count") are part of the shared storage
/// format and the CSV contract, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitType {
    /// Done / not done for the day. A check-in toggles the day's log.
    Checkbox,
    /// Several check-ins per day up to `max_check_in_count`, then wraps to empty.
    Count,
}

impl HabitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Checkbox => "Checkbox",
            HabitType::Count => "Count",
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Checkbox" | "checkbox" => Ok(HabitType::Checkbox),
            "Count" | "count" => Ok(HabitType::Count),
            other => Err(DomainError::UnknownHabitType(other.to_string())),
        }
    }
}

/// Named palette used to render a habit's heatmap cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTheme {
    #[default]
    Green,
    Blue,
    Orange,
    Purple,
}

impl ColorTheme {
    /// Every theme, in the order they are offered to the user
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Green,
        ColorTheme::Blue,
        ColorTheme::Orange,
        ColorTheme::Purple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Green => "Green",
            ColorTheme::Blue => "Blue",
            ColorTheme::Orange => "Orange",
            ColorTheme::Purple => "Purple",
        }
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorTheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ColorTheme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownColorTheme(trimmed.to_string()))
    }
}

/// Anything that identifies a calendar day
///
/// Logs are keyed by day, never by timestamp: the time-of-day component of
/// whatever the caller passes is discarded here.
pub trait AsCalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl AsCalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl AsCalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the day as seen in the timestamp's own time zone, so a
/// `DateTime<Local>` is normalized to local midnight.
impl<Tz: TimeZone> AsCalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: AsCalendarDay + ?Sized> AsCalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}
