/// App and widget sharing one database file
use chrono::NaiveDate;
use habit_grid::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;

#[cfg(test)]
mod widget_process_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    fn checkbox(name: &str) -> Habit {
        Habit::new(
            name.to_string(),
            "✅".to_string(),
            ColorTheme::Green,
            HabitType::Checkbox,
            5,
        )
        .expect("Failed to create habit")
    }

    #[test]
    fn test_widget_check_in_reaches_app_after_reload() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let path = temp_file.path();

        let mut app = HabitStore::open(
            SqliteStorage::new(path).unwrap(),
            RecordingSignal::new(),
            Config::default(),
        )
        .unwrap();
        let habit = checkbox("Vitamins");
        let id = habit.id;
        app.add_habit(habit).unwrap();

        let signal = Arc::new(RecordingSignal::new());
        let widget = WidgetExtension::new(
            SqliteStorage::new(path).unwrap(),
            Arc::clone(&signal),
            Config::default(),
        );

        // The widget sees the habit the app just added
        let timeline = widget.timeline(None, day(1)).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].today_count, 0);

        let outcome = widget.check_in(&id, day(1)).unwrap();
        assert_eq!(
            outcome,
            Some(CheckInOutcome::Created {
                count: CHECKBOX_FULL_COUNT
            })
        );
        assert_eq!(signal.app_notifications(), 1);

        // The app's in-memory copy is stale until it reloads
        assert_eq!(app.get_log_count_for_date(&id, day(1)), 0);
        app.reload().unwrap();
        assert_eq!(app.get_log_count_for_date(&id, day(1)), CHECKBOX_FULL_COUNT);

        // Toggling from the app is visible to the next widget read
        app.log_habit(&id, day(1)).unwrap();
        let entry = widget.entry(&id, day(1)).unwrap().unwrap();
        assert_eq!(entry.today_count, 0);
        assert_eq!(entry.level, 0);
    }

    #[test]
    fn test_last_full_snapshot_write_wins() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let path = temp_file.path();

        let mut app = HabitStore::open(
            SqliteStorage::new(path).unwrap(),
            RecordingSignal::new(),
            Config::default(),
        )
        .unwrap();
        let first = checkbox("Stretch");
        let first_id = first.id;
        app.add_habit(first).unwrap();

        let widget = WidgetExtension::new(
            SqliteStorage::new(path).unwrap(),
            RecordingSignal::new(),
            Config::default(),
        );
        widget.check_in(&first_id, day(2)).unwrap();

        // The app writes its stale snapshot back without reloading
        app.add_habit(checkbox("Sleep early")).unwrap();

        let fresh = SqliteStorage::new(path).unwrap().load().unwrap();
        assert_eq!(fresh.habits.len(), 2);
        assert!(fresh.logs.is_empty());
    }

    #[tokio::test]
    async fn test_host_serves_shared_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let path = temp_file.path();

        let mut app = HabitStore::open(
            SqliteStorage::new(path).unwrap(),
            RecordingSignal::new(),
            Config::default(),
        )
        .unwrap();
        let habit = Habit::new(
            "Water".to_string(),
            "💧".to_string(),
            ColorTheme::Blue,
            HabitType::Count,
            2,
        )
        .unwrap();
        let id = habit.id;
        app.add_habit(habit).unwrap();

        let mut host = WidgetHost::new(WidgetExtension::new(
            SqliteStorage::new(path).unwrap(),
            RecordingSignal::new(),
            Config::default(),
        ));

        let requests = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "widget/checkin",
                   "params": {"habitId": id.to_string(), "date": "2024-03-05"}}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "widget/checkin",
                   "params": {"habitId": id.to_string(), "date": "2024-03-05"}}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "widget/checkin",
                   "params": {"habitId": id.to_string(), "date": "2024-03-05"}}),
        ];
        let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();

        let mut output = Vec::new();
        host.serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
            .await
            .expect("host failed");

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let outcomes: Vec<&str> = responses
            .iter()
            .map(|response| response["result"]["result"]["outcome"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(outcomes, vec!["created", "incremented", "cleared"]);
        assert_eq!(responses[2]["id"], json!(3));

        app.reload().unwrap();
        assert_eq!(app.get_log_count_for_date(&id, day(5)), 0);
    }
}
