/// Tool for listing habits
///
/// This module implements the habit_list MCP tool with its two text views:
/// a fitted-width table and a one-line-per-habit list.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEngine;
use crate::domain::{HabitId, Periodicity};
use crate::storage::HabitStorage;
use crate::tools::{truncate, ToolError};

const TABLE_HEADER: [&str; 5] = ["Status", "Name", "Description", "Created", "Deadline"];

/// How the habit list is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListView {
    #[default]
    Table,
    List,
}

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only list habits of this periodicity: daily, weekly or monthly
    pub periodicity: Option<String>,
    /// "table" (default) or "list"
    pub view: Option<ListView>,
}

/// One habit as shown in the listing
#[derive(Debug, Clone, Serialize)]
pub struct HabitRow {
    pub habit_id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub periodicity: Periodicity,
    pub created_at: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub completed_this_period: bool,
}

impl HabitRow {
    fn status(&self) -> &'static str {
        if self.completed_this_period {
            "☑"
        } else {
            "☐"
        }
    }
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitRow>,
    pub message: String,
}

/// List habits with their status for the period containing `now`
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    now: NaiveDateTime,
) -> Result<ListHabitsResponse, ToolError> {
    let periodicity = params
        .periodicity
        .as_deref()
        .map(str::parse::<Periodicity>)
        .transpose()?;

    let engine = AnalyticsEngine::new(storage);
    let mut rows = Vec::new();
    for habit in storage.list_habits(periodicity)? {
        rows.push(HabitRow {
            deadline: engine.current_deadline(&habit, now)?,
            completed_this_period: engine.is_satisfied_this_period(&habit, now)?,
            habit_id: habit.id,
            name: habit.name,
            description: habit.description,
            periodicity: habit.periodicity,
            created_at: habit.created_at,
        });
    }

    let message = match params.view.unwrap_or_default() {
        ListView::Table => render_table(&rows),
        ListView::List => render_list(&rows),
    };

    Ok(ListHabitsResponse { habits: rows, message })
}

/// Left-aligned columns fitted to their widest cell
pub fn render_table(rows: &[HabitRow]) -> String {
    let mut cells: Vec<[String; 5]> = vec![TABLE_HEADER.map(str::to_string)];
    for row in rows {
        cells.push([
            row.status().to_string(),
            truncate(&row.name, 20, 18),
            truncate(row.description.as_deref().unwrap_or(""), 25, 22),
            row.created_at.format("%Y-%m-%d").to_string(),
            row.deadline.format("%Y-%m-%d").to_string(),
        ]);
    }

    let mut widths = [0usize; 5];
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines: Vec<String> = cells
        .iter()
        .map(|line| {
            line.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    lines.insert(1, separator);
    lines.join("\n")
}

/// One "- ☐ Name: description The deadline is ..." line per habit
pub fn render_list(rows: &[HabitRow]) -> String {
    if rows.is_empty() {
        return "No habits found.".to_string();
    }
    rows.iter()
        .map(|row| {
            format!(
                "- {} {}: {} The deadline is {}.",
                row.status(),
                row.name,
                row.description.as_deref().unwrap_or(""),
                row.deadline.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
