/// Cross-habit summary
///
/// Rolls the per-habit analytics up into one report. An empty habit set is
/// its own variant so callers never index into empty rankings.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analytics::{
    best_performing, is_satisfied, longest_streak_across, most_struggled, struggle_ranking,
    AnalyticsError, HabitHistory,
};
use crate::domain::Periodicity;

/// How many habits of one periodicity exist, and how many are done this period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodicityBreakdown {
    pub periodicity: Periodicity,
    pub completed: usize,
    pub total: usize,
}

/// Summary over a non-empty habit set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub total_habits: usize,
    /// One entry per periodicity, daily first
    pub breakdown: Vec<PeriodicityBreakdown>,
    pub longest_streak: u32,
    /// Name of the habit holding the longest streak
    pub longest_streak_habit: String,
    pub best_performing: String,
    pub most_struggled: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HabitSummary {
    /// No habits are registered
    Empty,
    Report(SummaryReport),
}

/// Summarize all habits as of `now`
pub fn summarize(histories: &[HabitHistory], now: NaiveDateTime) -> Result<HabitSummary, AnalyticsError> {
    let ranking = struggle_ranking(histories);
    let (Some(best), Some(worst), Some((streak_holder, longest_streak))) = (
        best_performing(&ranking),
        most_struggled(&ranking),
        longest_streak_across(histories),
    ) else {
        return Ok(HabitSummary::Empty);
    };

    let mut breakdown = Vec::with_capacity(Periodicity::ALL.len());
    for periodicity in Periodicity::ALL {
        let mut entry = PeriodicityBreakdown {
            periodicity,
            completed: 0,
            total: 0,
        };
        for history in histories.iter().filter(|h| h.habit.periodicity == periodicity) {
            entry.total += 1;
            if is_satisfied(periodicity, &history.dates, now)? {
                entry.completed += 1;
            }
        }
        breakdown.push(entry);
    }

    let longest_streak_habit = histories
        .iter()
        .find(|h| h.habit.id == streak_holder)
        .map(|h| h.habit.name.clone())
        .unwrap_or_default();

    Ok(HabitSummary::Report(SummaryReport {
        total_habits: histories.len(),
        breakdown,
        longest_streak,
        longest_streak_habit,
        best_performing: best.habit.name.clone(),
        most_struggled: worst.habit.name.clone(),
    }))
}
