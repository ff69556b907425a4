/// Basic unit tests to verify core functionality
use chrono::NaiveDate;
use habit_grid::storage::codec::{decode_collection, encode_collection};
use habit_grid::theme::{color, day_color, intensity_level};
use habit_grid::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn habit(habit_type: HabitType, max: u32) -> Habit {
        Habit::new(
            "Test Habit".to_string(),
            "🧪".to_string(),
            ColorTheme::Green,
            habit_type,
            max,
        )
        .expect("Failed to create habit")
    }

    #[test]
    fn test_habit_creation() {
        let habit = habit(HabitType::Count, 4);
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.max_check_in_count, 4);

        assert!(Habit::new(
            "   ".to_string(),
            String::new(),
            ColorTheme::Blue,
            HabitType::Checkbox,
            5
        )
        .is_err());
        assert!(Habit::new(
            "Zero".to_string(),
            String::new(),
            ColorTheme::Blue,
            HabitType::Count,
            0
        )
        .is_err());
    }

    #[test]
    fn test_checkbox_toggles() {
        let habit = habit(HabitType::Checkbox, 5);
        let mut logs = Vec::new();

        apply_check_in(&habit, &mut logs, day(1));
        assert_eq!(count_for_day(&logs, &habit.id, day(1)), CHECKBOX_FULL_COUNT);

        apply_check_in(&habit, &mut logs, day(1));
        assert_eq!(count_for_day(&logs, &habit.id, day(1)), 0);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_count_cycle_returns_to_start() {
        for max in 1..=6 {
            let habit = habit(HabitType::Count, max);
            let mut logs = Vec::new();

            let counts: Vec<u32> = (0..=max)
                .map(|_| {
                    apply_check_in(&habit, &mut logs, day(2));
                    count_for_day(&logs, &habit.id, day(2))
                })
                .collect();

            let mut expected: Vec<u32> = (1..=max).collect();
            expected.push(0);
            assert_eq!(counts, expected, "max {}", max);
            assert!(logs.is_empty());
        }
    }

    #[test]
    fn test_longest_streak_examples() {
        let id = HabitId::new();
        let logs: Vec<HabitLog> = [1, 2, 3, 5, 6]
            .into_iter()
            .map(|d| HabitLog::new(id, day(d), 1))
            .collect();

        assert_eq!(longest_streak(&logs, &id), 3);
        assert_eq!(longest_streak(&[], &id), 0);
        assert_eq!(longest_streak(&logs[..1], &id), 1);
    }

    #[test]
    fn test_persisted_layout() {
        let habit = habit(HabitType::Count, 3);
        let log = HabitLog::new(habit.id, day(9).and_hms_opt(18, 30, 0).unwrap(), 2);

        let habits = encode_collection(std::slice::from_ref(&habit)).unwrap();
        let logs = encode_collection(std::slice::from_ref(&log)).unwrap();
        assert!(habits.contains("\"habitType\":\"Count\""));
        assert!(habits.contains("\"colorTheme\":\"Green\""));
        assert!(logs.contains("\"date\":\"2024-01-09\""));

        let decoded_habits: Vec<Habit> = decode_collection("habits", Some(&habits));
        let decoded_logs: Vec<HabitLog> = decode_collection("habitLogs", Some(&logs));
        assert_eq!(decoded_habits, vec![habit]);
        assert_eq!(decoded_logs, vec![log]);

        let corrupt: Vec<Habit> = decode_collection("habits", Some("{not json"));
        assert!(corrupt.is_empty());
        let absent: Vec<HabitLog> = decode_collection("habitLogs", None);
        assert!(absent.is_empty());
    }

    #[test]
    fn test_theme_lookup() {
        assert_eq!(
            color(ColorTheme::Green, 0, Appearance::Light).to_hex(),
            "#EBEDF0"
        );
        assert_eq!(
            color(ColorTheme::Green, 5, Appearance::Dark).to_hex(),
            "#39D353"
        );
        // Out of range falls back to the empty level
        assert_eq!(
            color(ColorTheme::Purple, 42, Appearance::Light),
            color(ColorTheme::Purple, 0, Appearance::Light)
        );
        assert_eq!(
            color(ColorTheme::Blue, -1, Appearance::Dark),
            color(ColorTheme::Blue, 0, Appearance::Dark)
        );

        let count = habit(HabitType::Count, 10);
        assert_eq!(intensity_level(&count, 0), 0);
        assert_eq!(intensity_level(&count, 1), 1);
        assert_eq!(intensity_level(&count, 10), MAX_LEVEL);
        assert_eq!(
            day_color(&count, 10, Appearance::Light),
            color(ColorTheme::Green, MAX_LEVEL as i64, Appearance::Light)
        );
    }

    #[test]
    fn test_deep_link_parsing() {
        let id = HabitId::new();
        assert_eq!(
            DeepLink::parse(&format!("habitgrid://widget/checkin?habitId={}", id), "habitgrid"),
            Some(DeepLink::CheckIn(id))
        );
        assert_eq!(
            DeepLink::parse(&format!("habitgrid://widget/open?habitId={}", id), "other"),
            None
        );
    }
}
