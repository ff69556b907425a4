//! The app-side habit store
//!
//! `HabitStore` owns the in-memory habit and log collections for the running
//! app. It is constructed once at startup and passed to whoever needs it.
//! Every mutation writes both collections back to shared storage, tells the
//! widget to reload its timeline and notifies observers before returning.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::domain::{
    apply_check_in, count_for_day, current_streak, longest_streak, total_logged_days,
    AsCalendarDay, CheckInOutcome, Habit, HabitId, HabitLog, Streak,
};
use crate::refresh::RefreshSignal;
use crate::storage::{SharedStorage, StorageError};
use crate::theme::intensity_level;

/// Events delivered to store observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Habits or logs changed and were persisted
    Changed,
    /// Something (a deep link) asked the UI to focus a habit
    FocusRequested(HabitId),
}

/// Observer callback registered with [`HabitStore::subscribe`]
pub type Observer = Box<dyn Fn(&StoreEvent) + Send>;

/// One day in a habit's heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: usize,
}

/// In-memory owner of the habit and log collections
pub struct HabitStore<S: SharedStorage> {
    storage: S,
    signal: Box<dyn RefreshSignal>,
    config: Config,
    habits: Vec<Habit>,
    logs: Vec<HabitLog>,
    observers: Vec<Observer>,
}

impl<S: SharedStorage> HabitStore<S> {
    /// Load both collections from `storage` and build the store
    pub fn open(
        storage: S,
        signal: impl RefreshSignal + 'static,
        config: Config,
    ) -> Result<Self, StorageError> {
        let snapshot = storage.load()?;
        info!(
            "Habit store opened with {} habits and {} logs",
            snapshot.habits.len(),
            snapshot.logs.len()
        );

        Ok(Self {
            storage,
            signal: Box::new(signal),
            config,
            habits: snapshot.habits,
            logs: snapshot.logs,
            observers: Vec::new(),
        })
    }

    /// Re-read both collections from durable storage
    ///
    /// Called when another process (the widget) changed the data.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.storage.synchronize()?;
        let snapshot = self.storage.load()?;
        self.habits = snapshot.habits;
        self.logs = snapshot.logs;
        debug!("Reloaded habit store from storage");
        self.emit(&StoreEvent::Changed);
        Ok(())
    }

    /// Register an observer for store events
    pub fn subscribe(&mut self, observer: impl Fn(&StoreEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Habits in display order
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn logs(&self) -> &[HabitLog] {
        &self.logs
    }

    pub fn habit(&self, habit_id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == *habit_id)
    }

    /// All logs of one habit, oldest first
    pub fn logs_for(&self, habit_id: &HabitId) -> Vec<&HabitLog> {
        let mut logs: Vec<&HabitLog> = self
            .logs
            .iter()
            .filter(|log| log.habit_id == *habit_id)
            .collect();
        logs.sort_by_key(|log| log.date);
        logs
    }

    // CRUD

    pub fn can_add_habit(&self) -> bool {
        self.habits.len() < self.config.max_habits
    }

    /// Append a habit
    ///
    /// Returns `Ok(false)` without touching anything when the store is full.
    /// A daily maximum below 1 is stored as 1.
    pub fn add_habit(&mut self, mut habit: Habit) -> Result<bool, StorageError> {
        if !self.can_add_habit() {
            debug!(
                "Rejected habit '{}': limit of {} reached",
                habit.name, self.config.max_habits
            );
            return Ok(false);
        }

        habit.max_check_in_count = habit.max_check_in_count.max(1);
        debug!("Adding habit: {} ({})", habit.name, habit.id);
        self.habits.push(habit);
        self.commit()?;
        Ok(true)
    }

    /// Remove a habit and every log that references it
    pub fn remove_habit(&mut self, habit_id: &HabitId) -> Result<bool, StorageError> {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != *habit_id);
        if self.habits.len() == before {
            return Ok(false);
        }

        self.logs.retain(|log| log.habit_id != *habit_id);
        debug!("Removed habit {} and its logs", habit_id);
        self.commit()?;
        Ok(true)
    }

    /// Replace the stored habit with the same id
    ///
    /// The stored type and creation time win over whatever `habit` carries;
    /// the habit type is fixed at creation. A daily maximum below 1 is stored
    /// as 1. Unknown ids are a no-op.
    pub fn update_habit(&mut self, habit: Habit) -> Result<bool, StorageError> {
        let Some(stored) = self.habits.iter_mut().find(|h| h.id == habit.id) else {
            return Ok(false);
        };

        if stored.habit_type != habit.habit_type {
            debug!(
                "Ignoring habit type change for {}: {} stays {}",
                habit.id, habit.habit_type, stored.habit_type
            );
        }

        *stored = Habit {
            habit_type: stored.habit_type,
            created_at: stored.created_at,
            max_check_in_count: habit.max_check_in_count.max(1),
            ..habit
        };

        debug!("Updated habit: {} ({})", stored.name, stored.id);
        self.commit()?;
        Ok(true)
    }

    /// Reorder habits to follow `ordered_ids`
    ///
    /// Unknown ids are skipped; habits missing from `ordered_ids` keep their
    /// relative order after the listed ones.
    pub fn update_habit_order(&mut self, ordered_ids: &[HabitId]) -> Result<(), StorageError> {
        let mut remaining = std::mem::take(&mut self.habits);
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in ordered_ids {
            if let Some(index) = remaining.iter().position(|habit| habit.id == *id) {
                reordered.push(remaining.remove(index));
            }
        }
        reordered.append(&mut remaining);

        self.habits = reordered;
        self.commit()
    }

    // Check-ins

    /// Apply one check-in for `habit_id` on the calendar day of `date`
    ///
    /// Returns `None` for an unknown habit, in which case nothing is persisted.
    pub fn log_habit(
        &mut self,
        habit_id: &HabitId,
        date: impl AsCalendarDay,
    ) -> Result<Option<CheckInOutcome>, StorageError> {
        let Some(habit) = self.habits.iter().find(|h| h.id == *habit_id) else {
            debug!("Ignoring check-in for unknown habit {}", habit_id);
            return Ok(None);
        };

        let day = date.calendar_day();
        let outcome = apply_check_in(habit, &mut self.logs, day);
        debug!("Check-in for {} on {}: {:?}", habit_id, day, outcome);

        self.commit()?;
        Ok(Some(outcome))
    }

    /// The day's count for a habit, 0 when absent or unknown
    pub fn get_log_count_for_date(&self, habit_id: &HabitId, date: impl AsCalendarDay) -> u32 {
        count_for_day(&self.logs, habit_id, date)
    }

    // Statistics

    pub fn get_total_logged_days(&self, habit_id: &HabitId) -> u32 {
        total_logged_days(&self.logs, habit_id)
    }

    pub fn get_longest_streak(&self, habit_id: &HabitId) -> u32 {
        longest_streak(&self.logs, habit_id)
    }

    /// Current streak as of `today`
    pub fn current_streak(&self, habit_id: &HabitId, today: impl AsCalendarDay) -> u32 {
        current_streak(
            &self.logs,
            habit_id,
            today.calendar_day(),
            self.config.current_streak_scan_days,
        )
    }

    /// Current streak as of the local calendar day
    pub fn current_streak_today(&self, habit_id: &HabitId) -> u32 {
        self.current_streak(habit_id, Local::now())
    }

    /// All streak statistics for one habit, `None` if the habit is unknown
    pub fn streak(&self, habit_id: &HabitId, today: impl AsCalendarDay) -> Option<Streak> {
        self.habit(habit_id)?;
        Some(Streak::calculate_from_logs(
            *habit_id,
            &self.logs,
            today.calendar_day(),
            self.config.current_streak_scan_days,
        ))
    }

    /// `days` heatmap cells ending at `end`, oldest first
    pub fn heatmap(&self, habit_id: &HabitId, end: impl AsCalendarDay, days: u32) -> Vec<HeatmapCell> {
        let Some(habit) = self.habit(habit_id) else {
            return Vec::new();
        };

        let end = end.calendar_day();
        (0..i64::from(days))
            .rev()
            .map(|offset| {
                let date = end - Duration::days(offset);
                let count = count_for_day(&self.logs, habit_id, date);
                HeatmapCell {
                    date,
                    count,
                    level: intensity_level(habit, count),
                }
            })
            .collect()
    }

    // Bulk operations

    /// Append already-validated habits and logs in one write
    ///
    /// Used by CSV import, which checks ids and limits beforehand.
    pub fn insert_records(
        &mut self,
        habits: Vec<Habit>,
        logs: Vec<HabitLog>,
    ) -> Result<(), StorageError> {
        info!("Importing {} habits with {} logs", habits.len(), logs.len());
        self.habits.extend(habits);
        self.logs.extend(logs);
        self.commit()
    }

    /// Ask the UI to focus a habit; `false` if the habit is unknown
    pub fn request_focus(&self, habit_id: &HabitId) -> bool {
        if self.habit(habit_id).is_none() {
            return false;
        }
        self.emit(&StoreEvent::FocusRequested(*habit_id));
        true
    }

    /// Persist everything, then signal the widget and observers
    fn commit(&mut self) -> Result<(), StorageError> {
        if let Err(e) = self.storage.save(&self.habits, &self.logs) {
            error!("Failed to persist habit store: {}", e);
            return Err(e);
        }
        self.storage.synchronize()?;

        self.signal.reload_widget_timeline(&self.config.widget_kind);
        self.emit(&StoreEvent::Changed);
        Ok(())
    }

    fn emit(&self, event: &StoreEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }
}
