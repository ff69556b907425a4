//! Widget extension side of the shared store
//!
//! The widget runs in its own process and cannot see the app's in-memory
//! `HabitStore`. Every call here therefore synchronizes and re-reads durable
//! storage, works on that fresh copy, and writes the whole snapshot back.
//! Nothing is cached between calls.

pub mod host;
pub mod protocol;

pub use host::WidgetHost;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::deeplink::DeepLink;
use crate::domain::{
    apply_check_in, count_for_day, current_streak, AsCalendarDay, CheckInOutcome, Habit, HabitId,
    HabitType,
};
use crate::refresh::RefreshSignal;
use crate::storage::{SharedStorage, Snapshot, StorageError};
use crate::theme::{day_color, intensity_level, Appearance};

/// Everything a widget needs to draw one habit for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEntry {
    pub habit_id: HabitId,
    pub name: String,
    pub emoji: String,
    pub habit_type: HabitType,
    pub date: NaiveDate,
    pub today_count: u32,
    pub max_check_in_count: u32,
    pub current_streak: u32,
    pub level: usize,
    pub light_color: String,
    pub dark_color: String,
}

/// Result of a URL opened from the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WidgetUrlAction {
    /// The habit was checked in
    #[serde(rename_all = "camelCase")]
    CheckIn {
        habit_id: HabitId,
        result: CheckInOutcome,
    },
    /// The app should open focused on this habit
    #[serde(rename_all = "camelCase")]
    Open { habit_id: HabitId },
}

/// Widget-process data provider and action handler
pub struct WidgetExtension<S: SharedStorage> {
    storage: S,
    signal: Box<dyn RefreshSignal>,
    config: Config,
}

impl<S: SharedStorage> WidgetExtension<S> {
    pub fn new(storage: S, signal: impl RefreshSignal + 'static, config: Config) -> Self {
        Self {
            storage,
            signal: Box::new(signal),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flush, then read both collections from durable storage
    fn fresh_snapshot(&self) -> Result<Snapshot, StorageError> {
        self.storage.synchronize()?;
        self.storage.load()
    }

    /// Entries for every habit (or just `habit_id`) on `date`
    pub fn timeline(
        &self,
        habit_id: Option<&HabitId>,
        date: impl AsCalendarDay,
    ) -> Result<Vec<WidgetEntry>, StorageError> {
        let day = date.calendar_day();
        let snapshot = self.fresh_snapshot()?;

        let entries = snapshot
            .habits
            .iter()
            .filter(|habit| habit_id.map_or(true, |id| habit.id == *id))
            .map(|habit| self.entry_for(habit, &snapshot, day))
            .collect();
        Ok(entries)
    }

    /// The entry for one habit, `None` if it no longer exists
    pub fn entry(
        &self,
        habit_id: &HabitId,
        date: impl AsCalendarDay,
    ) -> Result<Option<WidgetEntry>, StorageError> {
        Ok(self.timeline(Some(habit_id), date)?.into_iter().next())
    }

    fn entry_for(&self, habit: &Habit, snapshot: &Snapshot, day: NaiveDate) -> WidgetEntry {
        let today_count = count_for_day(&snapshot.logs, &habit.id, day);
        WidgetEntry {
            habit_id: habit.id,
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            habit_type: habit.habit_type,
            date: day,
            today_count,
            max_check_in_count: habit.max_check_in_count,
            current_streak: current_streak(
                &snapshot.logs,
                &habit.id,
                day,
                self.config.current_streak_scan_days,
            ),
            level: intensity_level(habit, today_count),
            light_color: day_color(habit, today_count, Appearance::Light).to_hex(),
            dark_color: day_color(habit, today_count, Appearance::Dark).to_hex(),
        }
    }

    /// Check a habit in from the widget
    ///
    /// Reads a fresh snapshot, applies the same transition the app uses,
    /// writes the whole snapshot back, then reloads this widget kind's
    /// timeline and pokes the app. Unknown habits are a no-op.
    pub fn check_in(
        &self,
        habit_id: &HabitId,
        date: impl AsCalendarDay,
    ) -> Result<Option<CheckInOutcome>, StorageError> {
        let day = date.calendar_day();
        let mut snapshot = self.fresh_snapshot()?;

        let Some(habit) = snapshot.habits.iter().find(|h| h.id == *habit_id) else {
            debug!("Widget check-in for unknown habit {}", habit_id);
            return Ok(None);
        };

        let outcome = apply_check_in(habit, &mut snapshot.logs, day);
        self.storage.save(&snapshot.habits, &snapshot.logs)?;
        self.storage.synchronize()?;

        info!("Widget check-in for {} on {}: {:?}", habit_id, day, outcome);
        self.signal.reload_widget_timeline(&self.config.widget_kind);
        self.signal.notify_app();
        Ok(Some(outcome))
    }

    /// Handle a deep link tapped inside the widget
    ///
    /// Unrecognized links and unknown habits yield `None`.
    pub fn open_url(
        &self,
        raw: &str,
        today: impl AsCalendarDay,
    ) -> Result<Option<WidgetUrlAction>, StorageError> {
        let Some(link) = DeepLink::parse(raw, &self.config.url_scheme) else {
            return Ok(None);
        };

        match link {
            DeepLink::CheckIn(habit_id) => Ok(self
                .check_in(&habit_id, today)?
                .map(|result| WidgetUrlAction::CheckIn { habit_id, result })),
            DeepLink::Open(habit_id) => {
                let exists = self
                    .fresh_snapshot()?
                    .habits
                    .iter()
                    .any(|habit| habit.id == habit_id);
                Ok(exists.then_some(WidgetUrlAction::Open { habit_id }))
            }
        }
    }
}
