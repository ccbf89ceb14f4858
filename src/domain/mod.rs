/// Domain module containing core business data types
///
/// This module defines the core entities (Habit, Completion) and their
/// validation rules. These types represent the fundamental concepts in our
/// habit tracking system; everything derived from them lives in `analytics`.

pub mod habit;
pub mod completion;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid periodicity '{0}'. Allowed values: daily, weekly, monthly")]
    InvalidPeriodicity(String),

    #[error("Identifier must be an integer (ID) or a string (name), got {0}")]
    InvalidIdentifierType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
