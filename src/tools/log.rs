/// Tool for checking off habits
///
/// This module implements the habit_checkoff MCP tool.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analytics::{longest_streak, AnalyticsEngine};
use crate::storage::HabitStorage;
use crate::tools::{require_habit, ToolError};

/// Parameters for checking off a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckoffParams {
    /// Habit ID (integer) or name (string)
    pub habit: Value,
}

/// Response from checking off a habit
#[derive(Debug, Serialize)]
pub struct CheckoffResponse {
    pub message: String,
    pub longest_streak: u32,
}

/// Record a completion of the habit at `now`
///
/// Checking off twice on the same day is allowed; the analytics count the
/// day once.
pub fn checkoff<S: HabitStorage>(
    storage: &S,
    params: CheckoffParams,
    now: NaiveDateTime,
) -> Result<CheckoffResponse, ToolError> {
    let habit = require_habit(storage, &params.habit)?;
    storage.add_completion(habit.id, now)?;

    let history = AnalyticsEngine::new(storage).history(&habit)?;
    let streak = longest_streak(&history.dates);

    Ok(CheckoffResponse {
        message: format!(
            "Successfully checked off habit: '{}'. Keep it up! Longest streak: {} day{}",
            habit.name,
            streak,
            if streak == 1 { "" } else { "s" }
        ),
        longest_streak: streak,
    })
}
