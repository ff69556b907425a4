//! CSV import and export
//!
//! One row per log with the columns
//! `habit_id, habit_name, emoji, date, check_in_count, max_count, habit_type, color_theme`.
//! Import is all-or-nothing: the first bad row aborts the whole batch and
//! nothing is written.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ColorTheme, Habit, HabitId, HabitLog, HabitType, CHECKBOX_FULL_COUNT};
use crate::storage::{SharedStorage, StorageError};
use crate::store::HabitStore;

/// Date format of the `date` column
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that abort an import
///
/// Row numbers count data rows from 1, not including the header.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: invalid {field} '{value}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: habit {habit_id} already exists")]
    HabitExists { row: usize, habit_id: HabitId },

    #[error("Row {row}: habit {habit_id} is logged twice on {date}")]
    DuplicateDay {
        row: usize,
        habit_id: HabitId,
        date: NaiveDate,
    },

    #[error("Row {row}: {field} differs from earlier rows of habit {habit_id}")]
    InconsistentHabit {
        row: usize,
        field: &'static str,
        habit_id: HabitId,
    },

    #[error("Importing {incoming} habits would exceed the limit of {limit} (currently {existing})")]
    TooManyHabits {
        incoming: usize,
        existing: usize,
        limit: usize,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// What an import added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub habits: usize,
    pub logs: usize,
}

/// Parsed, validated rows ready to be inserted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Habits in first-seen order, each with its first row number
    pub habits: Vec<(usize, Habit)>,
    pub logs: Vec<HabitLog>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    habit_id: String,
    habit_name: String,
    emoji: String,
    date: String,
    check_in_count: String,
    max_count: String,
    habit_type: String,
    color_theme: String,
}

/// Write every log of every habit as CSV; returns the number of rows written
pub fn export_csv<S: SharedStorage, W: Write>(
    store: &HabitStore<S>,
    writer: W,
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for habit in store.habits() {
        for log in store.logs_for(&habit.id) {
            csv_writer.serialize(CsvRow {
                habit_id: habit.id.to_string(),
                habit_name: habit.name.clone(),
                emoji: habit.emoji.clone(),
                date: log.date.format(CSV_DATE_FORMAT).to_string(),
                check_in_count: log.count.to_string(),
                max_count: habit.max_check_in_count.to_string(),
                habit_type: habit.habit_type.to_string(),
                color_theme: habit.color_theme.to_string(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    tracing::info!("Exported {} log rows", rows);
    Ok(rows)
}

/// Parse and validate CSV rows without touching any store
pub fn parse_csv<R: Read>(reader: R) -> Result<ImportBatch, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut batch = ImportBatch::default();
    let mut habit_index: HashMap<HabitId, usize> = HashMap::new();
    let mut seen_days: HashSet<(HabitId, NaiveDate)> = HashSet::new();

    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = index + 1;
        let record = record?;

        let habit_id = HabitId::from_string(&record.habit_id)
            .map_err(|_| invalid(row, "habit_id", &record.habit_id))?;
        let date = NaiveDate::parse_from_str(&record.date, CSV_DATE_FORMAT)
            .map_err(|_| invalid(row, "date", &record.date))?;
        let count: u32 = record
            .check_in_count
            .parse()
            .map_err(|_| invalid(row, "check_in_count", &record.check_in_count))?;
        let max_count: u32 = record
            .max_count
            .parse()
            .ok()
            .filter(|max| *max >= 1)
            .ok_or_else(|| invalid(row, "max_count", &record.max_count))?;
        let habit_type: HabitType = record
            .habit_type
            .parse()
            .map_err(|_| invalid(row, "habit_type", &record.habit_type))?;
        let color_theme: ColorTheme = record
            .color_theme
            .parse()
            .map_err(|_| invalid(row, "color_theme", &record.color_theme))?;
        if habit_type == HabitType::Count && count > max_count {
            return Err(invalid(row, "check_in_count", &record.check_in_count));
        }
        if record.habit_name.is_empty() {
            return Err(invalid(row, "habit_name", &record.habit_name));
        }

        match habit_index.get(&habit_id) {
            Some(&position) => {
                let (_, existing) = &mut batch.habits[position];
                let mismatch = if existing.name != record.habit_name {
                    Some("habit_name")
                } else if existing.emoji != record.emoji {
                    Some("emoji")
                } else if existing.max_check_in_count != max_count {
                    Some("max_count")
                } else if existing.habit_type != habit_type {
                    Some("habit_type")
                } else if existing.color_theme != color_theme {
                    Some("color_theme")
                } else {
                    None
                };
                if let Some(field) = mismatch {
                    return Err(ImportError::InconsistentHabit { row, field, habit_id });
                }

                let day_start = date.and_time(NaiveTime::MIN).and_utc();
                if day_start < existing.created_at {
                    existing.created_at = day_start;
                }
            }
            None => {
                habit_index.insert(habit_id, batch.habits.len());
                batch.habits.push((
                    row,
                    Habit::from_existing(
                        habit_id,
                        record.habit_name.clone(),
                        record.emoji.clone(),
                        color_theme,
                        habit_type,
                        date.and_time(NaiveTime::MIN).and_utc(),
                        max_count,
                    ),
                ));
            }
        }

        if !seen_days.insert((habit_id, date)) {
            return Err(ImportError::DuplicateDay { row, habit_id, date });
        }

        // Empty days are never stored
        if count > 0 {
            let stored = match habit_type {
                HabitType::Checkbox => CHECKBOX_FULL_COUNT,
                HabitType::Count => count,
            };
            batch.logs.push(HabitLog::new(habit_id, date, stored));
        }
    }

    Ok(batch)
}

/// Import CSV into `store`
///
/// Rejects the whole batch if any habit id already exists or the habit limit
/// would be exceeded.
pub fn import_csv<S: SharedStorage, R: Read>(
    store: &mut HabitStore<S>,
    reader: R,
) -> Result<ImportSummary, ImportError> {
    let batch = parse_csv(reader)?;

    for (row, habit) in &batch.habits {
        if store.habit(&habit.id).is_some() {
            return Err(ImportError::HabitExists {
                row: *row,
                habit_id: habit.id,
            });
        }
    }

    let existing = store.habits().len();
    let limit = store.config().max_habits;
    if existing + batch.habits.len() > limit {
        return Err(ImportError::TooManyHabits {
            incoming: batch.habits.len(),
            existing,
            limit,
        });
    }

    let summary = ImportSummary {
        habits: batch.habits.len(),
        logs: batch.logs.len(),
    };
    if summary.habits == 0 {
        return Ok(summary);
    }

    let habits = batch.habits.into_iter().map(|(_, habit)| habit).collect();
    store.insert_records(habits, batch.logs)?;
    Ok(summary)
}

fn invalid(row: usize, field: &'static str, value: &str) -> ImportError {
    ImportError::InvalidField {
        row,
        field,
        value: value.to_string(),
    }
}
