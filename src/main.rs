/// Main entry point for the habit analytics MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_analytics::HabitTracker;

const DATABASE_FILE: &str = "habits.db";
const DEMO_DATABASE_FILE: &str = "habits_demo.db";

/// Find a writable data directory, trying the usual places in order
fn get_data_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".habit_tracker")),
        dirs::data_dir().map(|p| p.join("habit_tracker")),
        dirs::config_dir().map(|p| p.join("habit_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".habit_tracker")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.clone());
            }
        }
    }

    let temp_path = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;
    tracing::warn!("Using temporary directory for data: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the habit analytics MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, conflicts_with = "demo")]
    database: Option<PathBuf>,

    /// Use the demo database, seeding it with sample habits on first use
    #[arg(long)]
    demo: bool,

    /// Delete the demo database and exit
    #[arg(long)]
    reset_demo: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_analytics={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the MCP channel
        .init();

    if args.reset_demo {
        let demo_path = get_data_directory()?.join(DEMO_DATABASE_FILE);
        if demo_path.exists() {
            std::fs::remove_file(&demo_path)?;
            eprintln!("Demo database reset: {}", demo_path.display());
        } else {
            eprintln!("No demo database to reset.");
        }
        return Ok(());
    }

    info!("Starting habit analytics MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None if args.demo => get_data_directory()?.join(DEMO_DATABASE_FILE),
        None => get_data_directory()?.join(DATABASE_FILE),
    };

    info!("Using database at: {}", db_path.display());

    let tracker = HabitTracker::new(db_path)?;
    if args.demo {
        let now = chrono::Local::now().naive_local();
        let seeded = tracker.seed_demo_if_empty(now)?;
        if seeded > 0 {
            info!("Seeded demo database with {} habits", seeded);
        }
    }

    tracker.run().await?;

    info!("Habit analytics MCP server shutdown complete");
    Ok(())
}
