/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with the validated input types used to create
/// and modify habits.

use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use crate::domain::{DomainError, HabitId, Periodicity};

/// A habit represents something the user wants to do regularly
///
/// Habits are identified by their storage ID. The name is what users type, but
/// nothing prevents two habits from sharing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read a Book")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit should be performed
    pub periodicity: Periodicity,
    /// When this habit was created (local time)
    pub created_at: NaiveDateTime,
}

impl Habit {
    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading habits from the database.
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            description,
            periodicity,
            created_at,
        }
    }

    /// Apply an update with validation
    ///
    /// Returns whether any field actually changed, so callers can skip the
    /// write when nothing did.
    pub fn apply_update(&mut self, update: &HabitUpdate) -> Result<bool, DomainError> {
        if let Some(ref new_name) = update.name {
            validate_name(new_name)?;
        }
        if let Some(ref new_desc) = update.description {
            validate_description(new_desc)?;
        }

        let mut changed = false;
        if let Some(ref new_name) = update.name {
            let new_name = new_name.trim();
            if self.name != new_name {
                self.name = new_name.to_string();
                changed = true;
            }
        }
        if let Some(ref new_description) = update.description {
            if self.description != *new_description {
                self.description = new_description.clone();
                changed = true;
            }
        }
        if let Some(new_periodicity) = update.periodicity {
            if self.periodicity != new_periodicity {
                self.periodicity = new_periodicity;
                changed = true;
            }
        }

        Ok(changed)
    }
}

/// A validated habit that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub periodicity: Periodicity,
    pub created_at: NaiveDateTime,
}

impl NewHabit {
    /// Validate user input for a new habit
    ///
    /// The periodicity arrives as text and is rejected unless it is one of
    /// daily, weekly or monthly. Empty descriptions are stored as `None`.
    pub fn new(
        name: &str,
        description: Option<String>,
        periodicity: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        validate_name(name)?;
        let description = description.filter(|d| !d.trim().is_empty());
        validate_description(&description)?;
        let periodicity = periodicity.parse::<Periodicity>()?;

        Ok(Self {
            name: name.trim().to_string(),
            description,
            periodicity,
            created_at,
        })
    }
}

/// Requested changes to an existing habit; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub periodicity: Option<Periodicity>,
}

impl HabitUpdate {
    /// Build an update from raw input, validating the periodicity text
    pub fn parse(
        name: Option<String>,
        description: Option<String>,
        periodicity: Option<&str>,
    ) -> Result<Self, DomainError> {
        let periodicity = periodicity.map(str::parse::<Periodicity>).transpose()?;
        Ok(Self {
            name,
            description: description.map(|d| if d.trim().is_empty() { None } else { Some(d) }),
            periodicity,
        })
    }

    /// Whether the update requests any change at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.periodicity.is_none()
    }
}

// Validation helpers

/// Validate habit name according to business rules
fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::InvalidHabitName(
            "Habit name cannot be empty".to_string()
        ));
    }

    if trimmed.len() > 100 {
        return Err(DomainError::InvalidHabitName(
            "Habit name cannot be longer than 100 characters".to_string()
        ));
    }

    Ok(())
}

fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
    if let Some(desc) = description {
        if desc.len() > 500 {
            return Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string()
            });
        }
    }
    Ok(())
}
