/// Unit tests of the public analytics API, built around concrete date scenarios
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use habit_analytics::analytics::{
    analyze_gaps, best_performing, break_count, gap_records, is_satisfied, longest_streak,
    most_struggled, struggle_ranking, total_gap_days, GapRecord,
};
use habit_analytics::*;

/// "D": Wednesday 2025-06-11
fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 11).expect("valid date") - Duration::days(offset)
}

fn at(offset: i64, hour: u32) -> NaiveDateTime {
    day(offset).and_hms_opt(hour, 0, 0).expect("valid time")
}

fn dates(offsets: &[i64]) -> DateSet {
    DateSet::from_dates(offsets.iter().map(|o| day(*o)))
}

fn history(id: i64, name: &str, offsets: &[i64]) -> HabitHistory {
    let habit = Habit::from_existing(
        HabitId(id),
        name.to_string(),
        None,
        Periodicity::Daily,
        day(90).and_time(NaiveTime::MIN),
    );
    HabitHistory::new(habit, offsets.iter().map(|o| at(*o, 12)))
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_consecutive_days() {
        let d = dates(&[2, 1, 0]);
        assert_eq!(longest_streak(&d), 3);
        assert_eq!(break_count(&d), 0);
        assert_eq!(total_gap_days(&d), 0);
    }

    #[test]
    fn test_single_break() {
        let d = dates(&[5, 1]);
        assert_eq!(longest_streak(&d), 1);
        assert_eq!(break_count(&d), 1);
        assert_eq!(total_gap_days(&d), 3);
        assert_eq!(
            gap_records(&d),
            vec![GapRecord { break_date: day(5), resume_date: day(1) }]
        );
    }

    #[test]
    fn test_runs_with_one_gap() {
        let d = dates(&[10, 9, 5, 4, 3]);
        assert_eq!(longest_streak(&d), 3);
        let report = analyze_gaps(&d);
        assert_eq!(report.break_count, 1);
        assert_eq!(report.total_gap_days, 3);
        assert_eq!(report.gaps[0].missed_days(), 3);
    }

    #[test]
    fn test_same_day_completions_collapse() {
        let d = DateSet::from_timestamps(vec![at(1, 8), at(0, 9), at(0, 17)]);
        assert_eq!(d.len(), 2);
        assert_eq!(longest_streak(&d), 2);
        assert_eq!(break_count(&d), 0);
    }

    #[test]
    fn test_empty_history() {
        let d = DateSet::from_timestamps(Vec::new());
        assert_eq!(longest_streak(&d), 0);
        assert_eq!(break_count(&d), 0);
        assert_eq!(total_gap_days(&d), 0);
        assert!(gap_records(&d).is_empty());
    }

    #[test]
    fn test_struggle_ranking_order() {
        let histories = vec![
            history(1, "Steady", &[2, 1, 0]),
            history(2, "Erratic", &[10, 7, 4, 2]),
            history(3, "Patchy", &[4, 3, 1, 0]),
        ];
        let ranking = struggle_ranking(&histories);
        let scores: Vec<(String, u32)> = ranking
            .iter()
            .map(|r| (r.habit.name.clone(), r.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("Erratic".to_string(), 8),
                ("Patchy".to_string(), 2),
                ("Steady".to_string(), 0),
            ]
        );
        assert_eq!(most_struggled(&ranking).map(|r| r.habit.name.as_str()), Some("Erratic"));
        assert_eq!(best_performing(&ranking).map(|r| r.habit.name.as_str()), Some("Steady"));
    }

    #[test]
    fn test_weekly_deadline() {
        let wednesday = at(0, 15);
        let sunday_end = NaiveDate::from_ymd_opt(2025, 6, 15)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        assert_eq!(Periodicity::Weekly.deadline(wednesday).unwrap(), sunday_end);

        let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).and_then(|d| d.and_hms_opt(10, 0, 0)).unwrap();
        assert_eq!(Periodicity::Weekly.deadline(sunday).unwrap(), sunday_end);
    }

    #[test]
    fn test_monthly_deadline_in_leap_february() {
        let now = NaiveDate::from_ymd_opt(2024, 2, 15).and_then(|d| d.and_hms_opt(9, 0, 0)).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).and_then(|d| d.and_hms_opt(23, 59, 59)).unwrap();
        assert_eq!(Periodicity::Monthly.deadline(now).unwrap(), expected);
    }

    #[test]
    fn test_period_satisfaction() {
        let now = at(0, 15);
        // Monday of this week counts, the Sunday before doesn't
        assert!(is_satisfied(Periodicity::Weekly, &dates(&[2]), now).unwrap());
        assert!(!is_satisfied(Periodicity::Weekly, &dates(&[3]), now).unwrap());
        assert!(is_satisfied(Periodicity::Monthly, &dates(&[10]), now).unwrap());
        assert!(!is_satisfied(Periodicity::Monthly, &dates(&[11]), now).unwrap());
        assert!(!is_satisfied(Periodicity::Daily, &dates(&[1]), now).unwrap());
    }

    #[test]
    fn test_streak_invariants_hold_for_shuffled_input() {
        let ordered = vec![at(20, 7), at(19, 7), at(18, 22), at(12, 7), at(3, 7), at(2, 7), at(1, 7), at(0, 7)];
        let mut shuffled = ordered.clone();
        shuffled.reverse();
        shuffled.swap(1, 5);

        let a = DateSet::from_timestamps(ordered);
        let b = DateSet::from_timestamps(shuffled);
        assert_eq!(a, b);
        assert_eq!(longest_streak(&a), 4);
        assert!(longest_streak(&a) as usize <= a.len());
        assert!(total_gap_days(&a) >= break_count(&a));
        assert_eq!(break_count(&a), 2);
    }

    #[test]
    fn test_identifier_parsing() {
        assert_eq!(HabitIdentifier::parse("42"), HabitIdentifier::Id(HabitId(42)));
        assert_eq!(
            HabitIdentifier::parse("Read a Book"),
            HabitIdentifier::Name("Read a Book".to_string())
        );
        assert!(matches!(
            HabitIdentifier::from_json(&serde_json::json!(1.5)),
            Err(DomainError::InvalidIdentifierType(_))
        ));
        assert!(matches!(
            "fortnightly".parse::<Periodicity>(),
            Err(DomainError::InvalidPeriodicity(_))
        ));
    }
}
