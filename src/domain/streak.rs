//! Streak calculation
//!
//! Every stored log is an active day (empty days are deleted, never stored as
//! zero), so all statistics here work directly off the log dates.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{HabitId, HabitLog};

/// Default bound on how far back the current streak is scanned
pub const DEFAULT_STREAK_SCAN_DAYS: u32 = 100;

/// Calculated streak information for a habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    /// Which habit this streak data is for
    pub habit_id: HabitId,
    /// Consecutive active days ending today (or yesterday if today is still open)
    pub current_streak: u32,
    /// Best run of consecutive active days ever recorded
    pub longest_streak: u32,
    /// Most recent active day
    pub last_logged: Option<NaiveDate>,
    /// Number of days with a log
    pub total_logged_days: u32,
}

impl Streak {
    /// Create an empty streak record for a habit with no logs
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            longest_streak: 0,
            last_logged: None,
            total_logged_days: 0,
        }
    }

    /// Calculate all streak statistics for one habit
    ///
    /// `logs` may contain other habits' logs; they are ignored.
    pub fn calculate_from_logs(
        habit_id: HabitId,
        logs: &[HabitLog],
        today: NaiveDate,
        scan_days: u32,
    ) -> Self {
        let dates = active_dates(logs, &habit_id);
        if dates.is_empty() {
            return Self::new(habit_id);
        }

        Self {
            habit_id,
            current_streak: current_streak_from(&dates, today, scan_days),
            longest_streak: longest_streak_from(&dates),
            last_logged: dates.last().copied(),
            total_logged_days: dates.len() as u32,
        }
    }
}

/// Number of logged days for a habit
pub fn total_logged_days(logs: &[HabitLog], habit_id: &HabitId) -> u32 {
    logs.iter().filter(|log| log.habit_id == *habit_id).count() as u32
}

/// Longest run of consecutive logged days
///
/// 0 without logs, otherwise at least 1.
pub fn longest_streak(logs: &[HabitLog], habit_id: &HabitId) -> u32 {
    longest_streak_from(&active_dates(logs, habit_id))
}

/// Consecutive logged days counting back from `today`
///
/// A missing log for `today` is skipped rather than ending the streak, so the
/// streak still shows before the user has checked in today. The scan stops
/// after `scan_days` days.
pub fn current_streak(
    logs: &[HabitLog],
    habit_id: &HabitId,
    today: NaiveDate,
    scan_days: u32,
) -> u32 {
    current_streak_from(&active_dates(logs, habit_id), today, scan_days)
}

/// Sorted, de-duplicated active days for one habit
fn active_dates(logs: &[HabitLog], habit_id: &HabitId) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|log| log.habit_id == *habit_id && log.count > 0)
        .map(|log| log.date)
        .collect();
    dates.sort();
    dates.dedup();
    dates
}

fn longest_streak_from(sorted_dates: &[NaiveDate]) -> u32 {
    let Some(first) = sorted_dates.first() else {
        return 0;
    };

    let mut longest = 1;
    let mut running = 1;
    let mut previous = *first;

    for date in sorted_dates.iter().skip(1) {
        if (*date - previous).num_days() == 1 {
            running += 1;
        } else {
            running = 1;
        }
        longest = longest.max(running);
        previous = *date;
    }

    longest
}

fn current_streak_from(sorted_dates: &[NaiveDate], today: NaiveDate, scan_days: u32) -> u32 {
    let active: HashSet<NaiveDate> = sorted_dates.iter().copied().collect();
    let mut streak = 0;

    for offset in 0..i64::from(scan_days) {
        let day = today - Duration::days(offset);
        if active.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}
