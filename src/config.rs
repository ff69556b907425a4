//! Runtime configuration
//!
//! Defaults, then environment overrides, then whatever the CLI flags set.

use std::path::{Path, PathBuf};

use crate::domain::{DEFAULT_MAX_CHECK_IN_COUNT, DEFAULT_STREAK_SCAN_DAYS};
use crate::refresh::DEFAULT_WIDGET_KIND;

/// Default cap on the number of habits
pub const DEFAULT_MAX_HABITS: usize = 10;

/// Default scheme accepted by the deep-link handler
pub const DEFAULT_URL_SCHEME: &str = "habitgrid";

/// Settings shared by the app store, the widget process and the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shared database file
    pub database_path: PathBuf,
    /// Maximum number of habits the store accepts
    pub max_habits: usize,
    /// Daily maximum given to new habits when none is specified
    pub default_max_check_in: u32,
    /// Bound on the backward scan for the current streak
    pub current_streak_scan_days: u32,
    /// Scheme of recognized deep links
    pub url_scheme: String,
    /// Widget kind whose timeline is reloaded after changes
    pub widget_kind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("habits.db"),
            max_habits: DEFAULT_MAX_HABITS,
            default_max_check_in: DEFAULT_MAX_CHECK_IN_COUNT,
            current_streak_scan_days: DEFAULT_STREAK_SCAN_DAYS,
            url_scheme: DEFAULT_URL_SCHEME.to_string(),
            widget_kind: DEFAULT_WIDGET_KIND.to_string(),
        }
    }
}

impl Config {
    /// Defaults with the database at `database_path`
    pub fn with_database(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    /// Apply `HABIT_GRID_DATABASE` and `HABIT_GRID_MAX_HABITS` if set
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env(mut self) -> Self {
        if let Ok(path) = std::env::var("HABIT_GRID_DATABASE") {
            if !path.trim().is_empty() {
                self.database_path = PathBuf::from(path);
            }
        }

        if let Ok(raw) = std::env::var("HABIT_GRID_MAX_HABITS") {
            match raw.trim().parse::<usize>() {
                Ok(max) if max > 0 => self.max_habits = max,
                _ => tracing::warn!("Ignoring invalid HABIT_GRID_MAX_HABITS value '{}'", raw),
            }
        }

        self
    }
}

/// Get the default database path with robust fallback strategy
pub fn default_database_path() -> Result<PathBuf, std::io::Error> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".habit_grid")),
        dirs::data_dir().map(|p| p.join("habit_grid")),
        dirs::config_dir().map(|p| p.join("habit_grid")),
        std::env::current_dir().ok().map(|p| p.join(".habit_grid")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if is_writable_dir(potential_path) {
            return Ok(potential_path.join("habits.db"));
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_path = std::env::temp_dir().join("habit_grid");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("habits.db"))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".test_write");
    if std::fs::write(&probe, "test").is_ok() {
        let _ = std::fs::remove_file(&probe);
        true
    } else {
        false
    }
}
