/// Tools for cross-habit insights
///
/// This module implements the habit_struggle and habit_summary MCP tools.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, HabitSummary, StruggleRecord, SummaryReport};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for the struggle ranking (none)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StruggleParams {}

/// Response from the struggle ranking
#[derive(Debug, Serialize)]
pub struct StruggleResponse {
    pub ranking: Vec<StruggleRecord>,
    pub message: String,
}

/// Every habit ranked by struggle score, most struggled first
pub fn struggled_habits<S: HabitStorage>(
    storage: &S,
    _params: StruggleParams,
) -> Result<StruggleResponse, ToolError> {
    let ranking = AnalyticsEngine::new(storage).struggle_ranking()?;

    let mut lines = vec!["--- Habit Struggle Score (Higher is worse) ---".to_string()];
    lines.extend(ranking.iter().map(|record| {
        format!(
            "  - {}: Score {} ({} breaks, {} gap days)",
            record.habit.name, record.score, record.breaks, record.gap_days
        )
    }));

    Ok(StruggleResponse {
        ranking,
        message: lines.join("\n"),
    })
}

/// Parameters for the summary (none)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SummaryParams {}

/// Response from the summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: HabitSummary,
    pub message: String,
}

/// Overview of all habits as of `now`
pub fn habit_summary<S: HabitStorage>(
    storage: &S,
    _params: SummaryParams,
    now: NaiveDateTime,
) -> Result<SummaryResponse, ToolError> {
    let summary = AnalyticsEngine::new(storage).summary(now)?;
    let message = match &summary {
        HabitSummary::Empty => "No habits registered.".to_string(),
        HabitSummary::Report(report) => render_summary(report),
    };
    Ok(SummaryResponse { summary, message })
}

fn render_summary(report: &SummaryReport) -> String {
    let mut lines = vec![
        "--- Habit Summary ---".to_string(),
        format!("Total Registered Habits: {}", report.total_habits),
        String::new(),
        "Periodicity Breakdown:".to_string(),
    ];
    for entry in &report.breakdown {
        let label = format!("- {} (Completed / Total):", entry.periodicity.display_name());
        lines.push(format!("{:<30} {} / {}", label, entry.completed, entry.total));
    }
    lines.extend([
        String::new(),
        "Performance Highlights:".to_string(),
        format!("- Best Performing Habit: {}", report.best_performing),
        format!("- Most Struggled Habit:  {}", report.most_struggled),
        format!(
            "- Longest Streak:        {} days ({})",
            report.longest_streak, report.longest_streak_habit
        ),
        "---------------------".to_string(),
    ]);
    lines.join("\n")
}
