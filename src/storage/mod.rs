/// Storage layer for persisting habit data
///
/// This module handles all database operations. The analytics only ever see
/// the `HabitStorage` trait, so SQLite can be swapped for the in-memory store
/// (or anything else) without touching the streak and gap math.

pub mod sqlite;
pub mod memory;
pub mod migrations;
pub mod fixtures;

// Re-export the main storage types
pub use sqlite::*;
pub use memory::*;

use chrono::NaiveDateTime;
use thiserror::Error;
use crate::domain::{Completion, DomainError, Habit, HabitId, HabitIdentifier, NewHabit, Periodicity};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid stored data: {0}")]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Outcome of resolving a `HabitIdentifier`
///
/// Names are not unique, so a lookup by name can legitimately match several
/// habits. That case is reported as `Ambiguous` instead of picking one.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitLookup {
    Found(Habit),
    NotFound,
    Ambiguous { name: String, matches: usize },
}

impl HabitLookup {
    /// Classify the habits that matched a name
    pub fn from_matches(name: &str, mut habits: Vec<Habit>) -> Self {
        match habits.len() {
            0 => HabitLookup::NotFound,
            1 => habits.pop().map(HabitLookup::Found).unwrap_or(HabitLookup::NotFound),
            matches => HabitLookup::Ambiguous {
                name: name.to_string(),
                matches,
            },
        }
    }
}

/// Trait defining the storage interface for habits
///
/// The read side (`list_habits`, `list_completions`, `find_habit`) is all the
/// analytics engine needs; the write side backs the management tools.
pub trait HabitStorage {
    /// Store a new habit and return it with its assigned ID
    fn create_habit(&self, habit: &NewHabit) -> Result<Habit, StorageError>;

    /// Get a habit by ID, `None` if it doesn't exist
    fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>, StorageError>;

    /// All habits with exactly this name, in ID order
    fn find_by_name(&self, name: &str) -> Result<Vec<Habit>, StorageError>;

    /// Persist the fields of an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit together with all of its completions
    ///
    /// Returns the number of completions that were removed with it.
    fn delete_habit(&self, habit_id: HabitId) -> Result<usize, StorageError>;

    /// List habits, optionally only those with the given periodicity
    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError>;

    /// Record a completion for a habit at the given moment
    fn add_completion(&self, habit_id: HabitId, completed_at: NaiveDateTime) -> Result<Completion, StorageError>;

    /// Every completion record of a habit, oldest first
    fn list_completion_records(&self, habit_id: HabitId) -> Result<Vec<Completion>, StorageError>;

    /// Completion timestamps of a habit, oldest first
    fn list_completions(&self, habit_id: HabitId) -> Result<Vec<NaiveDateTime>, StorageError> {
        Ok(self
            .list_completion_records(habit_id)?
            .into_iter()
            .map(|c| c.completed_at)
            .collect())
    }

    /// Resolve an ID or name to a habit
    fn find_habit(&self, identifier: &HabitIdentifier) -> Result<HabitLookup, StorageError> {
        match identifier {
            HabitIdentifier::Id(id) => Ok(self
                .get_habit(*id)?
                .map(HabitLookup::Found)
                .unwrap_or(HabitLookup::NotFound)),
            HabitIdentifier::Name(name) => {
                let matches = self.find_by_name(name)?;
                Ok(HabitLookup::from_matches(name, matches))
            }
        }
    }
}
