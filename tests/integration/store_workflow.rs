/// App-side store workflows against a database file
use chrono::NaiveDate;
use habit_grid::*;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

#[cfg(test)]
mod store_workflow_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn open_store(path: &std::path::Path) -> HabitStore<SqliteStorage> {
        let storage = SqliteStorage::new(path).expect("Failed to create storage");
        HabitStore::open(storage, RecordingSignal::new(), Config::with_database(path))
            .expect("Failed to open store")
    }

    fn count_habit(name: &str, max: u32) -> Habit {
        Habit::new(
            name.to_string(),
            "📚".to_string(),
            ColorTheme::Blue,
            HabitType::Count,
            max,
        )
        .expect("Failed to create habit")
    }

    #[test]
    fn test_read_scenario_wraps_to_absent() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut store = open_store(temp_file.path());

        let habit = count_habit("Read", 3);
        let id = habit.id;
        assert!(store.add_habit(habit).unwrap());

        let counts: Vec<u32> = (0..4)
            .map(|_| store.log_habit(&id, day(10)).unwrap().unwrap().count())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 0]);
        assert_eq!(store.get_log_count_for_date(&id, day(10)), 0);
        assert!(store.logs().is_empty());

        // The durable copy agrees
        let reopened = open_store(temp_file.path());
        assert_eq!(reopened.get_log_count_for_date(&id, day(10)), 0);
        assert_eq!(reopened.habits().len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let (habits, logs) = {
            let mut store = open_store(temp_file.path());
            let read = count_habit("Read", 4);
            let walk = Habit::new(
                "Walk".to_string(),
                "🚶".to_string(),
                ColorTheme::Orange,
                HabitType::Checkbox,
                5,
            )
            .unwrap();
            let (read_id, walk_id) = (read.id, walk.id);
            store.add_habit(read).unwrap();
            store.add_habit(walk).unwrap();
            store.log_habit(&read_id, day(1)).unwrap();
            store.log_habit(&read_id, day(1)).unwrap();
            store.log_habit(&walk_id, day(2)).unwrap();
            (store.habits().to_vec(), store.logs().to_vec())
        };

        let reopened = open_store(temp_file.path());
        assert_eq!(reopened.habits(), habits.as_slice());
        assert_eq!(reopened.logs(), logs.as_slice());
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut store = open_store(temp_file.path());
        let habit = count_habit("Pushups", 5);
        let id = habit.id;
        store.add_habit(habit).unwrap();

        let morning = day(1).and_hms_opt(0, 0, 0).unwrap();
        let night = day(1).and_hms_opt(23, 59, 59).unwrap();
        store.log_habit(&id, morning).unwrap();
        store.log_habit(&id, night).unwrap();

        assert_eq!(store.get_log_count_for_date(&id, morning), 2);
        assert_eq!(store.get_log_count_for_date(&id, night), 2);
        assert_eq!(store.logs().len(), 1);
    }

    #[test]
    fn test_remove_deletes_logs() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut store = open_store(temp_file.path());
        let keep = count_habit("Keep", 2);
        let drop = count_habit("Drop", 2);
        let (keep_id, drop_id) = (keep.id, drop.id);
        store.add_habit(keep).unwrap();
        store.add_habit(drop).unwrap();
        for d in 1..=3 {
            store.log_habit(&keep_id, day(d)).unwrap();
            store.log_habit(&drop_id, day(d)).unwrap();
        }

        assert!(store.remove_habit(&drop_id).unwrap());
        assert!(store.habit(&drop_id).is_none());
        assert!(store.logs().iter().all(|log| log.habit_id == keep_id));
        assert_eq!(store.get_log_count_for_date(&drop_id, day(2)), 0);

        let reopened = open_store(temp_file.path());
        assert_eq!(reopened.logs().len(), 3);
        assert!(reopened.habit(&drop_id).is_none());
    }

    #[test]
    fn test_streak_statistics() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut store = open_store(temp_file.path());
        let habit = count_habit("Run", 1);
        let id = habit.id;
        store.add_habit(habit).unwrap();
        assert_eq!(store.get_longest_streak(&id), 0);

        for d in [1, 2, 3, 5, 6] {
            store.log_habit(&id, day(d)).unwrap();
        }

        assert_eq!(store.get_longest_streak(&id), 3);
        assert_eq!(store.get_total_logged_days(&id), 5);
        assert_eq!(store.current_streak(&id, day(6)), 2);
        // Today not yet logged still counts yesterday's run
        assert_eq!(store.current_streak(&id, day(7)), 2);
        assert_eq!(store.current_streak(&id, day(8)), 0);

        let streak = store.streak(&id, day(6)).unwrap();
        assert_eq!(streak.last_logged, Some(day(6)));
    }

    #[test]
    fn test_limit_and_order() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).unwrap();
        let config = Config {
            max_habits: 2,
            ..Config::with_database(temp_file.path())
        };
        let mut store = HabitStore::open(storage, RecordingSignal::new(), config).unwrap();

        let a = count_habit("A", 1);
        let b = count_habit("B", 1);
        let (a_id, b_id) = (a.id, b.id);
        assert!(store.add_habit(a).unwrap());
        assert!(store.add_habit(b).unwrap());
        assert!(!store.can_add_habit());
        assert!(!store.add_habit(count_habit("C", 1)).unwrap());
        assert_eq!(store.habits().len(), 2);

        store.update_habit_order(&[b_id, HabitId::new()]).unwrap();
        let order: Vec<HabitId> = store.habits().iter().map(|h| h.id).collect();
        assert_eq!(order, vec![b_id, a_id]);
    }

    #[test]
    fn test_every_mutation_notifies() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).unwrap();
        let signal = Arc::new(RecordingSignal::new());
        let mut store =
            HabitStore::open(storage, Arc::clone(&signal), Config::default()).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let habit = count_habit("Journal", 2);
        let id = habit.id;
        store.add_habit(habit.clone()).unwrap();
        store.log_habit(&id, day(1)).unwrap();
        let mut edited = habit;
        edited.edit(Some("Diary".to_string()), None, None, None).unwrap();
        store.update_habit(edited).unwrap();
        store.remove_habit(&id).unwrap();

        // Unknown ids change nothing and signal nothing
        store.log_habit(&id, day(1)).unwrap();

        assert_eq!(signal.reloads().len(), 4);
        assert!(signal.reloads().iter().all(|kind| kind == "HabitWidget"));
        assert_eq!(events.lock().unwrap().len(), 4);
    }
}
