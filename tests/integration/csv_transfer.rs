/// CSV export and import between two database files
use chrono::NaiveDate;
use habit_grid::transfer::{export_csv, import_csv};
use habit_grid::*;
use tempfile::tempdir;

#[cfg(test)]
mod csv_transfer_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
    }

    fn open_store(path: &std::path::Path) -> HabitStore<SqliteStorage> {
        HabitStore::open(
            SqliteStorage::new(path).expect("Failed to create storage"),
            RecordingSignal::new(),
            Config::with_database(path),
        )
        .expect("Failed to open store")
    }

    #[test]
    fn test_export_then_import_into_fresh_database() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut source = open_store(&dir.path().join("source.db"));

        let read = Habit::new(
            "Read, slowly".to_string(),
            "📚".to_string(),
            ColorTheme::Purple,
            HabitType::Count,
            3,
        )
        .unwrap();
        let floss = Habit::new(
            "Floss".to_string(),
            "🦷".to_string(),
            ColorTheme::Orange,
            HabitType::Checkbox,
            5,
        )
        .unwrap();
        let (read_id, floss_id) = (read.id, floss.id);
        source.add_habit(read).unwrap();
        source.add_habit(floss).unwrap();
        source.log_habit(&read_id, day(1)).unwrap();
        source.log_habit(&read_id, day(1)).unwrap();
        source.log_habit(&read_id, day(3)).unwrap();
        source.log_habit(&floss_id, day(2)).unwrap();

        let mut exported = Vec::new();
        let rows = export_csv(&source, &mut exported).unwrap();
        assert_eq!(rows, 3);

        let mut target = open_store(&dir.path().join("target.db"));
        let summary = import_csv(&mut target, exported.as_slice()).unwrap();
        assert_eq!(summary, ImportSummary { habits: 2, logs: 3 });

        let imported = target.habit(&read_id).unwrap();
        assert_eq!(imported.name, "Read, slowly");
        assert_eq!(imported.habit_type, HabitType::Count);
        assert_eq!(imported.max_check_in_count, 3);
        assert_eq!(target.get_log_count_for_date(&read_id, day(1)), 2);
        assert_eq!(target.get_log_count_for_date(&floss_id, day(2)), CHECKBOX_FULL_COUNT);
        assert_eq!(target.get_longest_streak(&read_id), 1);

        // The import was persisted
        let reopened = open_store(&dir.path().join("target.db"));
        assert_eq!(reopened.logs().len(), 3);
    }

    #[test]
    fn test_reimport_is_rejected_without_changes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = open_store(&dir.path().join("habits.db"));
        let habit = Habit::new(
            "Walk".to_string(),
            "🚶".to_string(),
            ColorTheme::Green,
            HabitType::Count,
            2,
        )
        .unwrap();
        let id = habit.id;
        store.add_habit(habit).unwrap();
        store.log_habit(&id, day(4)).unwrap();

        let mut exported = Vec::new();
        export_csv(&store, &mut exported).unwrap();

        let err = import_csv(&mut store, exported.as_slice()).unwrap_err();
        assert!(matches!(err, ImportError::HabitExists { row: 1, habit_id } if habit_id == id));
        assert_eq!(store.habits().len(), 1);
        assert_eq!(store.logs().len(), 1);
    }

    #[test]
    fn test_bad_row_aborts_whole_import() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = open_store(&dir.path().join("habits.db"));
        let data = "\
habit_id,habit_name,emoji,date,check_in_count,max_count,habit_type,color_theme
6a1f4e2c-0b3d-4c5e-8f7a-9b0c1d2e3f4a,Read,📚,2024-05-01,1,3,Count,Blue
6a1f4e2c-0b3d-4c5e-8f7a-9b0c1d2e3f4a,Read,📚,05/02/2024,1,3,Count,Blue
";

        let err = import_csv(&mut store, data.as_bytes()).unwrap_err();
        match err {
            ImportError::InvalidField { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "date");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.habits().is_empty());
        assert!(store.logs().is_empty());
    }
}
