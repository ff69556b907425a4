//! JSON encoding of the persisted collections
//!
//! Decoding is best-effort: a corrupt or missing value yields an empty
//! collection, and a single undecodable element (unknown enum name, bad UUID)
//! is dropped without discarding its neighbours. Decoded logs are then
//! repaired so every (habit, day) has at most one non-empty row.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::HabitId;
use crate::storage::{Snapshot, StorageError};

/// Encode a collection as a JSON array
pub fn encode_collection<T: Serialize>(items: &[T]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(items)?)
}

/// Decode the JSON array stored under `key`
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let elements: Vec<Value> = match serde_json::from_str(raw) {
        Ok(elements) => elements,
        Err(e) => {
            warn!("Stored value for '{}' is not a JSON array, treating as empty: {}", key, e);
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping undecodable element {} of '{}': {}", index, key, e);
                None
            }
        })
        .collect()
}

/// Drop decoded rows that break the collection invariants
///
/// Logs with a zero count, repeated (habit, day) rows after the first, and
/// logs of unknown habits are removed. A daily maximum below 1 is raised to 1.
pub fn repair_snapshot(mut snapshot: Snapshot) -> Snapshot {
    for habit in &mut snapshot.habits {
        if habit.max_check_in_count == 0 {
            warn!("Habit {} has a daily maximum of 0, using 1", habit.id);
            habit.max_check_in_count = 1;
        }
    }

    let known: HashSet<HabitId> = snapshot.habits.iter().map(|habit| habit.id).collect();
    let mut seen = HashSet::new();
    snapshot.logs.retain(|log| {
        if log.count == 0 {
            warn!("Dropping empty log {} for {} on {}", log.id, log.habit_id, log.date);
            false
        } else if !known.contains(&log.habit_id) {
            warn!("Dropping log {} of unknown habit {}", log.id, log.habit_id);
            false
        } else if !seen.insert((log.habit_id, log.date)) {
            warn!("Dropping duplicate log {} for {} on {}", log.id, log.habit_id, log.date);
            false
        } else {
            true
        }
    });

    snapshot
}
