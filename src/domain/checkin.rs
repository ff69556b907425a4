//! Check-in state machine
//!
//! A (habit, day) pair is either absent (no log row) or active (a row with
//! `count > 0`). `apply_check_in` is the only place that moves between the
//! two; the app store and the widget process both call it on their own copy
//! of the log collection.

use serde::Serialize;

use crate::domain::{AsCalendarDay, Habit, HabitId, HabitLog, HabitType};

/// Count stored for a checked checkbox habit
///
/// Only presence matters for checkbox habits; the value equals the top theme
/// level so a checked day always renders at full intensity.
pub const CHECKBOX_FULL_COUNT: u32 = 5;

/// What a single check-in did to the day's log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CheckInOutcome {
    /// absent -> active
    Created { count: u32 },
    /// active -> active with one more check-in
    Incremented { count: u32 },
    /// active -> absent (checkbox toggled off, or count habit pressed at its cap)
    Cleared,
}

impl CheckInOutcome {
    /// The day's count after the transition
    pub fn count(&self) -> u32 {
        match self {
            CheckInOutcome::Created { count } | CheckInOutcome::Incremented { count } => *count,
            CheckInOutcome::Cleared => 0,
        }
    }
}

/// Apply one check-in for `habit` on the calendar day of `date`
///
/// Count habits reset once the stored count has reached `max_check_in_count`
/// (`count >= max`), so `max + 1` consecutive calls return the day to absent.
pub fn apply_check_in(
    habit: &Habit,
    logs: &mut Vec<HabitLog>,
    date: impl AsCalendarDay,
) -> CheckInOutcome {
    let day = date.calendar_day();
    let position = logs.iter().position(|log| log.matches(&habit.id, day));

    match (habit.habit_type, position) {
        (HabitType::Checkbox, None) => {
            logs.push(HabitLog::new(habit.id, day, CHECKBOX_FULL_COUNT));
            CheckInOutcome::Created {
                count: CHECKBOX_FULL_COUNT,
            }
        }
        (HabitType::Checkbox, Some(index)) => {
            logs.remove(index);
            CheckInOutcome::Cleared
        }
        (HabitType::Count, None) => {
            logs.push(HabitLog::new(habit.id, day, 1));
            CheckInOutcome::Created { count: 1 }
        }
        (HabitType::Count, Some(index)) => {
            if logs[index].count >= habit.max_check_in_count {
                logs.remove(index);
                CheckInOutcome::Cleared
            } else {
                logs[index].count += 1;
                CheckInOutcome::Incremented {
                    count: logs[index].count,
                }
            }
        }
    }
}

/// The day's count for a habit, 0 when there is no log
pub fn count_for_day(logs: &[HabitLog], habit_id: &HabitId, date: impl AsCalendarDay) -> u32 {
    let day = date.calendar_day();
    logs.iter()
        .find(|log| log.matches(habit_id, day))
        .map(|log| log.count)
        .unwrap_or(0)
}
