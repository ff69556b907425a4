//! Habit entity and related functionality
//!
//! This module defines the Habit struct that represents something the user
//! checks in on every day, along with construction-time validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ColorTheme, DomainError, HabitId, HabitType};

/// Daily target used when a habit doesn't specify one
pub const DEFAULT_MAX_CHECK_IN_COUNT: u32 = 5;

fn default_max_check_in_count() -> u32 {
    DEFAULT_MAX_CHECK_IN_COUNT
}

/// A habit the user wants to track
///
/// Field names on the wire are camelCase because the persisted `"habits"`
/// array is shared with the widget process and must keep its layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Read", "Drink water")
    pub name: String,
    /// Short glyph shown next to the name
    pub emoji: String,
    /// Palette used for this habit's heatmap
    pub color_theme: ColorTheme,
    /// Checkbox or count. Never changes after creation.
    pub habit_type: HabitType,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Optional custom background, kept for storage compatibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Daily target for count habits; the "full" color reference for checkbox habits
    #[serde(default = "default_max_check_in_count")]
    pub max_check_in_count: u32,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The name must not be blank and the daily maximum must be at least 1.
    pub fn new(
        name: String,
        emoji: String,
        color_theme: ColorTheme,
        habit_type: HabitType,
        max_check_in_count: u32,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_emoji(&emoji)?;
        Self::validate_max_check_in_count(max_check_in_count)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            emoji,
            color_theme,
            habit_type,
            created_at: Utc::now(),
            background_color: None,
            max_check_in_count,
        })
    }

    /// Build a habit from already-known fields (CSV import, storage)
    ///
    /// No validation happens here beyond clamping the maximum to at least 1.
    pub fn from_existing(
        id: HabitId,
        name: String,
        emoji: String,
        color_theme: ColorTheme,
        habit_type: HabitType,
        created_at: DateTime<Utc>,
        max_check_in_count: u32,
    ) -> Self {
        Self {
            id,
            name,
            emoji,
            color_theme,
            habit_type,
            created_at,
            background_color: None,
            max_check_in_count: max_check_in_count.max(1),
        }
    }

    /// Apply user edits to the editable fields
    ///
    /// `habit_type`, `id` and `created_at` are not editable.
    pub fn edit(
        &mut self,
        name: Option<String>,
        emoji: Option<String>,
        color_theme: Option<ColorTheme>,
        max_check_in_count: Option<u32>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_emoji) = emoji {
            Self::validate_emoji(new_emoji)?;
        }
        if let Some(max) = max_check_in_count {
            Self::validate_max_check_in_count(max)?;
        }

        if let Some(new_name) = name {
            self.name = new_name.trim().to_string();
        }
        if let Some(new_emoji) = emoji {
            self.emoji = new_emoji;
        }
        if let Some(theme) = color_theme {
            self.color_theme = theme;
        }
        if let Some(max) = max_check_in_count {
            self.max_check_in_count = max;
        }

        Ok(())
    }

    pub fn is_checkbox(&self) -> bool {
        self.habit_type == HabitType::Checkbox
    }

    /// Label used in listings, e.g. "📚 Read"
    pub fn display_name(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_emoji(emoji: &str) -> Result<(), DomainError> {
        if emoji.chars().count() > 8 {
            return Err(DomainError::InvalidEmoji(format!(
                "'{}' is too long for a habit glyph",
                emoji
            )));
        }
        Ok(())
    }

    fn validate_max_check_in_count(max: u32) -> Result<(), DomainError> {
        if max == 0 {
            return Err(DomainError::InvalidMaxCheckInCount(
                "Max check-in count must be at least 1".to_string(),
            ));
        }
        if max > 100 {
            return Err(DomainError::InvalidMaxCheckInCount(
                "Max check-in count cannot exceed 100".to_string(),
            ));
        }
        Ok(())
    }
}
