/// Longest-streak calculation
///
/// A streak is a maximal run of calendar-consecutive completion dates.

use crate::analytics::{DateSet, HabitHistory};
use crate::domain::HabitId;

/// Length in days of the longest run of consecutive dates
///
/// Empty sets have no streak; a single date is a streak of one.
pub fn longest_streak(dates: &DateSet) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut current = 1;
    for step in dates.day_steps() {
        if step.days == 1 {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

/// The habit holding the longest streak, and its length
///
/// Ties go to the habit encountered first. `None` when there are no habits.
pub fn longest_streak_across(histories: &[HabitHistory]) -> Option<(HabitId, u32)> {
    let mut best: Option<(HabitId, u32)> = None;
    for history in histories {
        let streak = longest_streak(&history.dates);
        match best {
            Some((_, longest)) if streak <= longest => {}
            _ => best = Some((history.habit.id, streak)),
        }
    }
    best
}
