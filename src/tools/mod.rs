/// MCP tools for habit management and analysis
///
/// This module contains all the tools that external MCP clients can call to
/// interact with the habit tracker. Each tool takes a deserialized parameter
/// struct and returns a response whose `message` is the text shown to the user.

pub mod create;
pub mod log;
pub mod update;
pub mod list;
pub mod status;
pub mod insights;

pub use create::*;
pub use log::*;
pub use update::*;
pub use list::*;
pub use status::*;
pub use insights::*;

use serde_json::Value;
use thiserror::Error;

use crate::analytics::{AnalyticsEngine, AnalyticsError};
use crate::domain::{DomainError, Habit, HabitIdentifier};
use crate::storage::{HabitStorage, StorageError};

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Habit '{0}' not found")]
    HabitNotFound(String),

    #[error("A habit with the name '{0}' already exists")]
    DuplicateName(String),

    #[error("Please provide at least one option to update")]
    NothingToUpdate,

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Resolve a JSON identifier to exactly one habit
///
/// Missing habits and ambiguous names both end the tool call with an error.
pub(crate) fn require_habit<S: HabitStorage>(storage: &S, identifier: &Value) -> Result<Habit, ToolError> {
    let identifier = HabitIdentifier::from_json(identifier)?;
    AnalyticsEngine::new(storage)
        .resolve(&identifier)?
        .ok_or_else(|| ToolError::HabitNotFound(identifier.to_string()))
}

/// Whether some habit other than `except` already uses `name`
pub(crate) fn name_taken<S: HabitStorage>(
    storage: &S,
    name: &str,
    except: Option<&Habit>,
) -> Result<bool, StorageError> {
    let matches = storage.find_by_name(name.trim())?;
    Ok(matches.iter().any(|h| except.map_or(true, |e| e.id != h.id)))
}

/// Shorten `text` to `keep` characters plus ".." when longer than `limit`
pub(crate) fn truncate(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut short: String = text.chars().take(keep).collect();
        short.push_str("..");
        short
    } else {
        text.to_string()
    }
}
