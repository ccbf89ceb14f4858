/// Struggle scoring and ranking
///
/// Struggle score = breaks + total gap days. Larger means more erratic.

use serde::Serialize;

use crate::analytics::{analyze_gaps, HabitHistory};
use crate::domain::Habit;

/// Struggle score of one habit with its components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StruggleRecord {
    pub habit: Habit,
    pub score: u32,
    pub breaks: u32,
    pub gap_days: u32,
}

impl StruggleRecord {
    pub fn for_history(history: &HabitHistory) -> Self {
        let gaps = analyze_gaps(&history.dates);
        Self {
            habit: history.habit.clone(),
            score: gaps.break_count.saturating_add(gaps.total_gap_days),
            breaks: gaps.break_count,
            gap_days: gaps.total_gap_days,
        }
    }
}

/// Score every habit and sort by score, highest first
///
/// Habits with equal scores keep their input order. Habits without enough
/// completions to have a gap score 0 and are still listed.
pub fn struggle_ranking(histories: &[HabitHistory]) -> Vec<StruggleRecord> {
    let mut ranking: Vec<StruggleRecord> = histories.iter().map(StruggleRecord::for_history).collect();
    // `sort_by` is stable
    ranking.sort_by(|a, b| b.score.cmp(&a.score));
    ranking
}

/// Head of a ranking; `None` for an empty ranking
pub fn most_struggled(ranking: &[StruggleRecord]) -> Option<&StruggleRecord> {
    ranking.first()
}

/// Tail of a ranking; `None` for an empty ranking
pub fn best_performing(ranking: &[StruggleRecord]) -> Option<&StruggleRecord> {
    ranking.last()
}
