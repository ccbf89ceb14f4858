/// Tools for streak and gap analysis
///
/// This module implements the habit_streak and habit_gaps MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analytics::{AnalyticsEngine, GapReport};
use crate::domain::{HabitId, HabitIdentifier};
use crate::storage::HabitStorage;
use crate::tools::{require_habit, ToolError};

/// Parameters for the streak analysis
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StreakParams {
    /// Habit ID (integer) or name (string); omit for the longest streak across all habits
    pub habit: Option<Value>,
}

/// Response from the streak analysis
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub longest_streak: u32,
    pub message: String,
}

/// Longest streak of one habit or of all habits
///
/// A habit that doesn't exist has a streak of 0; an ambiguous name is an error.
pub fn longest_streak<S: HabitStorage>(
    storage: &S,
    params: StreakParams,
) -> Result<StreakResponse, ToolError> {
    let engine = AnalyticsEngine::new(storage);

    let identifier = params
        .habit
        .as_ref()
        .filter(|value| !value.is_null())
        .map(HabitIdentifier::from_json)
        .transpose()?;

    let streak = engine.longest_streak(identifier.as_ref())?;
    let message = match identifier {
        Some(identifier) => format!("Longest streak for '{}': {} days", identifier, streak),
        None => format!("Longest streak across all habits: {} days", streak),
    };

    Ok(StreakResponse {
        longest_streak: streak,
        message,
    })
}

/// Parameters for the gap analysis
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GapsParams {
    /// Habit ID (integer) or name (string)
    pub habit: Value,
}

/// Response from the gap analysis
#[derive(Debug, Serialize)]
pub struct GapsResponse {
    pub habit_id: HabitId,
    #[serde(flatten)]
    pub report: GapReport,
    pub message: String,
}

/// Breaks and missed days of one habit
pub fn habit_gaps<S: HabitStorage>(storage: &S, params: GapsParams) -> Result<GapsResponse, ToolError> {
    let habit = require_habit(storage, &params.habit)?;
    let report = AnalyticsEngine::new(storage).gap_report(&habit)?;

    let mut lines = vec![
        format!("--- Gap Report for '{}' ---", habit.name),
        format!("Breaks: {}", report.break_count),
        format!("Total gap days: {}", report.total_gap_days),
    ];
    if report.gaps.is_empty() {
        lines.push("No breaks recorded.".to_string());
    }
    for gap in &report.gaps {
        lines.push(format!(
            "  - {} -> {} ({} days missed)",
            gap.break_date.format("%Y-%m-%d"),
            gap.resume_date.format("%Y-%m-%d"),
            gap.missed_days()
        ));
    }

    Ok(GapsResponse {
        habit_id: habit.id,
        report,
        message: lines.join("\n"),
    })
}
