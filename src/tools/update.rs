/// Tools for modifying and removing existing habits
///
/// This module implements the habit_update and habit_delete MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::HabitUpdate;
use crate::storage::HabitStorage;
use crate::tools::{name_taken, require_habit, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// Habit ID (integer) or name (string)
    pub habit: Value,
    /// A new name for the habit
    pub new_name: Option<String>,
    /// A new description for the habit
    pub description: Option<String>,
    /// A new periodicity: daily, weekly or monthly
    pub periodicity: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub changed: bool,
    pub message: String,
}

/// Update name, description and/or periodicity of a habit
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let update = HabitUpdate::parse(
        params.new_name,
        params.description,
        params.periodicity.as_deref(),
    )?;
    if update.is_empty() {
        return Err(ToolError::NothingToUpdate);
    }

    let mut habit = require_habit(storage, &params.habit)?;

    if let Some(ref new_name) = update.name {
        if name_taken(storage, new_name, Some(&habit))? {
            return Err(ToolError::DuplicateName(new_name.trim().to_string()));
        }
    }

    let original_name = habit.name.clone();
    let changed = habit.apply_update(&update)?;
    if changed {
        storage.update_habit(&habit)?;
        tracing::info!("Updated habit {} ('{}')", habit.id, habit.name);
    }

    Ok(UpdateHabitResponse {
        changed,
        message: if changed {
            format!("Successfully updated habit '{}'.", original_name)
        } else {
            format!("Habit '{}' already has these values.", original_name)
        },
    })
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// Habit ID (integer) or name (string)
    pub habit: Value,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub completions_removed: usize,
    pub message: String,
}

/// Delete a habit along with all of its completions
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit = require_habit(storage, &params.habit)?;
    let removed = storage.delete_habit(habit.id)?;
    tracing::info!("Deleted habit {} ('{}') and {} completions", habit.id, habit.name, removed);

    Ok(DeleteHabitResponse {
        completions_removed: removed,
        message: format!(
            "Successfully deleted habit '{}' and {} completion{}.",
            habit.name,
            removed,
            if removed == 1 { "" } else { "s" }
        ),
    })
}
