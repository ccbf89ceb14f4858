/// Tool for creating new habits
///
/// This module implements the habit_add MCP tool.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, NewHabit};
use crate::storage::HabitStorage;
use crate::tools::{name_taken, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddHabitParams {
    /// Name of the habit
    pub name: String,
    /// A short description of the habit
    pub description: Option<String>,
    /// daily, weekly or monthly (defaults to daily)
    pub periodicity: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct AddHabitResponse {
    pub habit_id: HabitId,
    pub message: String,
}

/// Create a new habit, refusing names that are already in use
pub fn add_habit<S: HabitStorage>(
    storage: &S,
    params: AddHabitParams,
    now: NaiveDateTime,
) -> Result<AddHabitResponse, ToolError> {
    let periodicity = params.periodicity.as_deref().unwrap_or("daily");
    let new_habit = NewHabit::new(&params.name, params.description, periodicity, now)?;

    if name_taken(storage, &new_habit.name, None)? {
        return Err(ToolError::DuplicateName(new_habit.name));
    }

    let habit = storage.create_habit(&new_habit)?;
    tracing::info!("Added habit '{}' ({})", habit.name, habit.periodicity);

    Ok(AddHabitResponse {
        habit_id: habit.id,
        message: format!(
            "Successfully added habit: '{}' with {} periodicity.",
            habit.name, habit.periodicity
        ),
    })
}
