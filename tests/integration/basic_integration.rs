/// Integration tests: SQLite on disk, the tool layer and the MCP server together
use chrono::{Duration, NaiveDate, NaiveDateTime};
use habit_analytics::mcp::McpServer;
use habit_analytics::storage::fixtures;
use habit_analytics::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn fixed_now() -> NaiveDateTime {
    // A Wednesday
    NaiveDate::from_ymd_opt(2025, 6, 11)
        .and_then(|d| d.and_hms_opt(15, 30, 0))
        .expect("valid date")
}

fn days_ago(days: i64) -> NaiveDateTime {
    fixed_now() - Duration::days(days)
}

fn new_habit(name: &str, periodicity: &str) -> NewHabit {
    NewHabit::new(name, None, periodicity, days_ago(30)).expect("valid habit")
}

fn call_tool(server: &mut McpServer<SqliteStorage>, id: i64, tool: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    });
    let response = server
        .process_line(&request.to_string())
        .expect("tools/call always gets a response");
    serde_json::to_value(response).expect("response serializes")
}

fn result_text(response: &Value) -> String {
    response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_tracker_opens_database() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let tracker = HabitTracker::new(dir.path().join("habits.db")).expect("Failed to create tracker");

        assert!(tracker.storage().list_habits(None).unwrap().is_empty());
        assert_eq!(tracker.analytics().longest_streak(None).unwrap(), 0);
    }

    #[test]
    fn test_database_persistence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");

        let habit_id = {
            let storage = SqliteStorage::new(&db_path).expect("Failed to open database");
            let habit = storage.create_habit(&new_habit("Read", "daily")).unwrap();
            for days in [3, 2, 1] {
                storage.add_completion(habit.id, days_ago(days)).unwrap();
            }
            habit.id
        };

        let storage = SqliteStorage::new(&db_path).expect("Failed to reopen database");
        let habit = storage.get_habit(habit_id).unwrap().expect("habit survives reopen");
        assert_eq!(habit.name, "Read");
        assert_eq!(storage.list_completions(habit_id).unwrap().len(), 3);

        let engine = AnalyticsEngine::new(&storage);
        assert_eq!(engine.longest_streak(Some(&HabitIdentifier::Id(habit_id))).unwrap(), 3);
    }

    #[test]
    fn test_cascade_delete_on_disk() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db")).unwrap();
        let keep = storage.create_habit(&new_habit("Keep", "daily")).unwrap();
        let gone = storage.create_habit(&new_habit("Drop", "daily")).unwrap();
        storage.add_completion(keep.id, days_ago(1)).unwrap();
        storage.add_completion(gone.id, days_ago(1)).unwrap();
        storage.add_completion(gone.id, days_ago(0)).unwrap();

        assert_eq!(storage.delete_habit(gone.id).unwrap(), 2);

        assert!(storage.list_completions(gone.id).unwrap().is_empty());
        assert_eq!(storage.list_completions(keep.id).unwrap().len(), 1);
        let engine = AnalyticsEngine::new(&storage);
        assert_eq!(engine.longest_streak(Some(&HabitIdentifier::Id(gone.id))).unwrap(), 0);
        assert_eq!(engine.struggle_ranking().unwrap().len(), 1);
    }

    #[test]
    fn test_storage_interface() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db")).expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
        assert_eq!(
            storage.find_habit(&HabitIdentifier::Name("Nobody".to_string())).unwrap(),
            HabitLookup::NotFound
        );
    }

    #[test]
    fn test_demo_seed_and_summary() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let tracker = HabitTracker::new(dir.path().join("habits_demo.db")).unwrap();

        assert_eq!(tracker.seed_demo_if_empty(fixed_now()).unwrap(), 15);
        // A second start leaves the existing data alone
        assert_eq!(tracker.seed_demo_if_empty(fixed_now()).unwrap(), 0);

        let HabitSummary::Report(report) = tracker.analytics().summary(fixed_now()).unwrap() else {
            panic!("demo data should produce a report");
        };
        assert_eq!(report.total_habits, 15);
        // "Morning Journal" was done on each of the last ten days
        assert_eq!(report.longest_streak, 10);
        assert_eq!(report.longest_streak_habit, "Morning Journal");
    }

    #[test]
    fn test_demo_fixtures_are_consistent_with_storage() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits_demo.db")).unwrap();
        let expected = fixtures::demo_fixtures(fixed_now()).unwrap();
        fixtures::seed_demo(&storage, fixed_now()).unwrap();

        let habits = storage.list_habits(None).unwrap();
        assert_eq!(habits.len(), expected.len());
        for (habit, fixture) in habits.iter().zip(&expected) {
            assert_eq!(habit.name, fixture.habit.name);
            assert_eq!(
                storage.list_completions(habit.id).unwrap().len(),
                fixture.completions.len()
            );
        }
    }

    #[test]
    fn test_mcp_session_end_to_end() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db")).unwrap();
        let mut server = McpServer::new(storage).with_clock(fixed_now);

        let init = server
            .process_line(r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{}}"#)
            .unwrap();
        assert!(init.error.is_none());
        assert!(server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());

        let added = call_tool(&mut server, 1, "habit_add", json!({"name": "Stretch", "description": "Five minutes"}));
        assert!(result_text(&added).contains("'Stretch' with daily periodicity"));

        let checked = call_tool(&mut server, 2, "habit_checkoff", json!({"habit": "Stretch"}));
        assert_eq!(checked["result"]["isError"], false);

        let listed = call_tool(&mut server, 3, "habit_list", json!({"view": "list"}));
        assert_eq!(
            result_text(&listed),
            "- ☑ Stretch: Five minutes The deadline is 2025-06-11 23:59."
        );

        let renamed = call_tool(&mut server, 4, "habit_update", json!({"habit": 1, "new_name": "Stretching"}));
        assert_eq!(renamed["result"]["isError"], false);

        let streak = call_tool(&mut server, 5, "habit_streak", json!({"habit": "Stretching"}));
        assert_eq!(result_text(&streak), "Longest streak for 'Stretching': 1 days");

        let deleted = call_tool(&mut server, 6, "habit_delete", json!({"habit": "Stretching"}));
        assert!(result_text(&deleted).starts_with("Successfully deleted habit 'Stretching'"));

        let summary = call_tool(&mut server, 7, "habit_summary", json!({}));
        assert_eq!(result_text(&summary), "No habits registered.");
        assert!(server.storage().list_habits(None).unwrap().is_empty());
    }

    #[test]
    fn test_mcp_reports_ambiguous_names() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db")).unwrap();
        storage.create_habit(&new_habit("Twin", "daily")).unwrap();
        storage.create_habit(&new_habit("Twin", "weekly")).unwrap();
        let mut server = McpServer::new(storage).with_clock(fixed_now);

        let response = call_tool(&mut server, 1, "habit_streak", json!({"habit": "Twin"}));
        assert_eq!(response["result"]["isError"], true);
        assert!(result_text(&response).contains("Multiple habits found with name 'Twin' (2 matches)"));

        let by_id = call_tool(&mut server, 2, "habit_streak", json!({"habit": 2}));
        assert_eq!(result_text(&by_id), "Longest streak for '2': 0 days");

        let bad_type = call_tool(&mut server, 3, "habit_gaps", json!({"habit": true}));
        assert_eq!(bad_type["result"]["isError"], true);
    }
}
