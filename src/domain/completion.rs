/// Completion entity for tracking habit check-offs
///
/// A completion is one "I did it" event. Checking a habit off twice on the same
/// day produces two completions; the analytics collapse them to one date.

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime};
use crate::domain::{CompletionId, HabitId};

/// A record of completing a habit at a specific moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this completion
    pub id: CompletionId,
    /// Which habit this completion belongs to
    pub habit_id: HabitId,
    /// When the habit was checked off (local time)
    pub completed_at: NaiveDateTime,
}

impl Completion {
    /// Create a completion from existing data (used when loading from database)
    pub fn from_existing(id: CompletionId, habit_id: HabitId, completed_at: NaiveDateTime) -> Self {
        Self {
            id,
            habit_id,
            completed_at,
        }
    }

    /// The calendar day this completion counts towards
    pub fn calendar_date(&self) -> NaiveDate {
        self.completed_at.date()
    }
}
