/// Public library interface for the habit analytics MCP server
///
/// This module exports the analytics engine, the storage layer and the MCP
/// server so they can be used by the binary, other applications or tests.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod analytics;
pub mod tools;
pub mod mcp;

pub use domain::*;
pub use storage::{HabitLookup, HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use analytics::{AnalyticsEngine, AnalyticsError, DateSet, HabitHistory, HabitSummary};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker backed by a SQLite database
///
/// Owns the storage; analytics borrow it through `analytics()`.
pub struct HabitTracker {
    storage: SqliteStorage,
}

impl HabitTracker {
    /// Open (or create) the database at `db_path`
    ///
    /// The schema is created or migrated on open.
    pub fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Ok(Self { storage })
    }

    /// Fill an empty database with the demo habit set
    ///
    /// Returns the number of habits seeded, 0 if the database already had habits.
    pub fn seed_demo_if_empty(&self, now: NaiveDateTime) -> Result<usize, ServerError> {
        if !self.storage.list_habits(None)?.is_empty() {
            return Ok(0);
        }
        Ok(storage::fixtures::seed_demo(&self.storage, now)?)
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(None)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self.storage);
        mcp_server.run().await
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn analytics(&self) -> AnalyticsEngine<'_, SqliteStorage> {
        AnalyticsEngine::new(&self.storage)
    }
}
