/// Demo data for the sandbox database
///
/// Daily habits are placed relative to `now` so their streaks stay current.
/// Weekly and monthly habits use fixed days of the previous two calendar
/// months, which keeps their week/month boundaries the same for everyone
/// seeding on the same day.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{DomainError, NewHabit};
use crate::storage::{HabitStorage, StorageError};

/// A habit and the completions to seed it with
#[derive(Debug, Clone)]
pub struct Fixture {
    pub habit: NewHabit,
    pub completions: Vec<NaiveDateTime>,
}

/// Build the demo habit set relative to `now`
pub fn demo_fixtures(now: NaiveDateTime) -> Result<Vec<Fixture>, StorageError> {
    let days_ago = |days: i64| now - Duration::days(days);
    let last_month = |day: u32| month_day(now, 1, day);
    let two_months_ago = |day: u32| month_day(now, 2, day);

    let nine_am = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);

    let entries: Vec<(&str, Option<&str>, &str, Vec<NaiveDateTime>)> = vec![
        (
            "Daily Meditation",
            Some("10 minutes of mindfulness."),
            "daily",
            vec![days_ago(2), days_ago(1), now],
        ),
        (
            "Workout",
            Some("At least 30 minutes of exercise."),
            "daily",
            vec![days_ago(40), days_ago(20)],
        ),
        (
            "Read a Book",
            Some("Read at least one chapter."),
            "daily",
            vec![days_ago(2).date().and_time(nine_am)],
        ),
        (
            "Practice Guitar",
            Some("A new habit with no completions yet."),
            "daily",
            vec![],
        ),
        (
            "Morning Journal",
            Some("Write one page of thoughts."),
            "daily",
            (0..10).map(days_ago).collect(),
        ),
        (
            "Code for 30 Minutes",
            Some("Work on a personal project."),
            "daily",
            (1..15).step_by(2).map(days_ago).collect(),
        ),
        (
            "Learn Spanish on Duolingo",
            Some("Complete one lesson."),
            "daily",
            vec![days_ago(55)],
        ),
        ("Tidy Desk", None, "daily", vec![now]),
        (
            "Weekly Review",
            Some("Plan the upcoming week."),
            "weekly",
            vec![two_months_ago(10)?, last_month(15)?, now],
        ),
        (
            "Submit Timesheet",
            Some("Submit hours for payroll."),
            "weekly",
            vec![last_month(22)?, now],
        ),
        (
            "Water the Plants",
            Some("Check soil and water if needed."),
            "weekly",
            vec![last_month(1)?, now],
        ),
        (
            "Organize Digital Files",
            Some("Clean up desktop and downloads folder."),
            "weekly",
            vec![last_month(5)?],
        ),
        (
            "Call Family or Friends",
            Some("Catch up with a loved one."),
            "weekly",
            vec![two_months_ago(1)?, last_month(1)?],
        ),
        (
            "Pay Monthly Bills",
            Some("Pay rent, utilities, etc."),
            "monthly",
            vec![two_months_ago(28)?],
        ),
        (
            "Review Monthly Budget",
            Some("Check spending against budget."),
            "monthly",
            vec![last_month(25)?, now],
        ),
    ];

    entries
        .into_iter()
        .map(|(name, description, periodicity, completions)| -> Result<Fixture, StorageError> {
            let habit = NewHabit::new(name, description.map(str::to_string), periodicity, now)?;
            Ok(Fixture { habit, completions })
        })
        .collect()
}

/// Insert the demo habit set into `storage`
///
/// Returns the number of habits created.
pub fn seed_demo<S: HabitStorage>(storage: &S, now: NaiveDateTime) -> Result<usize, StorageError> {
    let fixtures = demo_fixtures(now)?;
    for fixture in &fixtures {
        let habit = storage.create_habit(&fixture.habit)?;
        for completed_at in &fixture.completions {
            storage.add_completion(habit.id, *completed_at)?;
        }
    }

    tracing::info!("Seeded demo database with {} habits", fixtures.len());
    Ok(fixtures.len())
}

/// Midnight on `day` of the month `months_back` months before `now`
fn month_day(now: NaiveDateTime, months_back: u32, day: u32) -> Result<NaiveDateTime, StorageError> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|first| first.checked_sub_months(Months::new(months_back)))
        .and_then(|first| first.with_day(day))
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| {
            StorageError::Domain(DomainError::InvalidDate(format!(
                "day {} of the month {} months before {}",
                day, months_back, now
            )))
        })
}
