/// Analytics engine for streaks, gaps, deadlines and struggle scores
///
/// The functions in the submodules are pure: they take normalized dates (and
/// an explicit `now` where a period matters) and return plain values.
/// `AnalyticsEngine` is the thin layer that pulls habits and completions out
/// of a `HabitStorage` and feeds them through those functions.

pub mod dates;
pub mod streak;
pub mod gaps;
pub mod period;
pub mod struggle;
pub mod summary;

pub use dates::*;
pub use streak::*;
pub use gaps::*;
pub use period::*;
pub use struggle::*;
pub use summary::*;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{DomainError, Habit, HabitIdentifier, Periodicity};
use crate::storage::{HabitLookup, HabitStorage, StorageError};

/// Errors that can occur while computing analytics
///
/// A habit that doesn't exist is not an error here; lookups return `None`.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Multiple habits found with name '{name}' ({matches} matches). Please use the habit ID")]
    AmbiguousIdentifier { name: String, matches: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HabitLookup {
    /// Collapse a lookup into `Option`, turning ambiguity into an error
    pub fn into_option(self) -> Result<Option<Habit>, AnalyticsError> {
        match self {
            HabitLookup::Found(habit) => Ok(Some(habit)),
            HabitLookup::NotFound => Ok(None),
            HabitLookup::Ambiguous { name, matches } => {
                Err(AnalyticsError::AmbiguousIdentifier { name, matches })
            }
        }
    }
}

/// A habit together with its normalized completion dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitHistory {
    pub habit: Habit,
    pub dates: DateSet,
}

impl HabitHistory {
    pub fn new<I>(habit: Habit, completions: I) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        Self {
            habit,
            dates: DateSet::from_timestamps(completions),
        }
    }
}

/// Analytics over the habits held by a storage backend
pub struct AnalyticsEngine<'s, S: HabitStorage> {
    storage: &'s S,
}

impl<'s, S: HabitStorage> AnalyticsEngine<'s, S> {
    pub fn new(storage: &'s S) -> Self {
        Self { storage }
    }

    /// Resolve an ID or name; `None` when nothing matches
    pub fn resolve(&self, identifier: &HabitIdentifier) -> Result<Option<Habit>, AnalyticsError> {
        self.storage.find_habit(identifier)?.into_option()
    }

    /// Load and normalize one habit's completions
    pub fn history(&self, habit: &Habit) -> Result<HabitHistory, AnalyticsError> {
        let completions = self.storage.list_completions(habit.id)?;
        Ok(HabitHistory::new(habit.clone(), completions))
    }

    /// Histories of all habits, optionally of one periodicity only
    pub fn histories(&self, periodicity: Option<Periodicity>) -> Result<Vec<HabitHistory>, AnalyticsError> {
        self.storage
            .list_habits(periodicity)?
            .iter()
            .map(|habit| self.history(habit))
            .collect()
    }

    /// Longest streak of one habit, or across all habits when no identifier is given
    ///
    /// An identifier that matches nothing (e.g. a deleted habit) yields 0.
    pub fn longest_streak(&self, identifier: Option<&HabitIdentifier>) -> Result<u32, AnalyticsError> {
        let habits = match identifier {
            Some(identifier) => self.resolve(identifier)?.into_iter().collect(),
            None => self.storage.list_habits(None)?,
        };
        self.longest_streak_of(&habits)
    }

    /// Longest streak among the given habits, 0 if there are none
    pub fn longest_streak_of(&self, habits: &[Habit]) -> Result<u32, AnalyticsError> {
        let histories = habits
            .iter()
            .map(|habit| self.history(habit))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(longest_streak_across(&histories).map_or(0, |(_, streak)| streak))
    }

    pub fn break_count(&self, habit: &Habit) -> Result<u32, AnalyticsError> {
        Ok(break_count(&self.history(habit)?.dates))
    }

    /// Total missed days between completions
    pub fn gap_count(&self, habit: &Habit) -> Result<u32, AnalyticsError> {
        Ok(total_gap_days(&self.history(habit)?.dates))
    }

    pub fn gap_records(&self, habit: &Habit) -> Result<Vec<GapRecord>, AnalyticsError> {
        Ok(gap_records(&self.history(habit)?.dates))
    }

    pub fn gap_report(&self, habit: &Habit) -> Result<GapReport, AnalyticsError> {
        Ok(analyze_gaps(&self.history(habit)?.dates))
    }

    /// Every habit ranked by struggle score, most struggled first
    pub fn struggle_ranking(&self) -> Result<Vec<StruggleRecord>, AnalyticsError> {
        Ok(struggle_ranking(&self.histories(None)?))
    }

    pub fn current_deadline(&self, habit: &Habit, now: NaiveDateTime) -> Result<NaiveDateTime, AnalyticsError> {
        habit.periodicity.deadline(now)
    }

    pub fn is_satisfied_this_period(&self, habit: &Habit, now: NaiveDateTime) -> Result<bool, AnalyticsError> {
        let history = self.history(habit)?;
        is_satisfied(habit.periodicity, &history.dates, now)
    }

    pub fn summary(&self, now: NaiveDateTime) -> Result<HabitSummary, AnalyticsError> {
        summarize(&self.histories(None)?, now)
    }
}
