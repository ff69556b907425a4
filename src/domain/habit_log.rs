//! HabitLog entity: one habit's check-in intensity for one calendar day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AsCalendarDay, HabitId, LogId};

/// A record of checking in on a habit on a specific day
///
/// There is at most one log per (habit, day). A log with `count == 0` is never
/// stored; clearing a day removes the row instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    /// Unique identifier for this log row
    pub id: LogId,
    /// Which habit this log belongs to
    pub habit_id: HabitId,
    /// Which day the check-ins were for
    pub date: NaiveDate,
    /// Current check-in intensity for the day
    pub count: u32,
}

impl HabitLog {
    /// Create a log for the calendar day of `date`
    pub fn new(habit_id: HabitId, date: impl AsCalendarDay, count: u32) -> Self {
        Self {
            id: LogId::new(),
            habit_id,
            date: date.calendar_day(),
            count,
        }
    }

    /// Whether this log is for `habit_id` on the same calendar day as `date`
    pub fn matches(&self, habit_id: &HabitId, date: impl AsCalendarDay) -> bool {
        self.habit_id == *habit_id && self.date == date.calendar_day()
    }
}
