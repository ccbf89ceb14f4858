/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// This module defines the JSON-RPC message format MCP clients use to talk to
/// the habit analytics server, plus the tool catalogue published by tools/list.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analytics::AnalyticsError;
use crate::domain::DomainError;
use crate::storage::StorageError;
use crate::tools::{
    AddHabitParams, CheckoffParams, DeleteHabitParams, GapsParams, ListHabitsParams, StreakParams,
    StruggleParams, SummaryParams, ToolError, UpdateHabitParams,
};

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[allow(dead_code)]
    pub jsonrpc: String,
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to call (e.g. "tools/call")
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parameters of a tools/call request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g. "habit_streak")
    pub name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Result of executing a tool
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// A tool as advertised to MCP clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's arguments
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// JSON-RPC error codes
pub mod error_codes {
    /// Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// The requested method doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Method exists but parameters are wrong
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific codes live in -32000 to -32099
    pub const HABIT_NOT_FOUND: i32 = -32001;
    /// A habit with this name already exists
    pub const DUPLICATE_NAME: i32 = -32002;
    pub const VALIDATION_ERROR: i32 = -32003;
    pub const STORAGE_ERROR: i32 = -32004;
    /// A name matched several habits
    pub const AMBIGUOUS_IDENTIFIER: i32 = -32005;
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message, data }),
        }
    }
}

impl ToolCallResult {
    /// A successful result with text content
    pub fn success(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: false,
        }
    }

    /// A failed tool call; the error code travels along in the text
    pub fn error(error: &ToolError) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: format!("Error ({}): {}", tool_error_code(error), error),
            }],
            is_error: true,
        }
    }
}

/// Map a tool error to the JSON-RPC error code describing it
pub fn tool_error_code(error: &ToolError) -> i32 {
    match error {
        ToolError::HabitNotFound(_) => error_codes::HABIT_NOT_FOUND,
        ToolError::DuplicateName(_) => error_codes::DUPLICATE_NAME,
        ToolError::NothingToUpdate => error_codes::INVALID_PARAMS,
        ToolError::Domain(e) => domain_error_code(e),
        ToolError::Analytics(e) => analytics_error_code(e),
        ToolError::Storage(e) => storage_error_code(e),
    }
}

fn domain_error_code(error: &DomainError) -> i32 {
    match error {
        DomainError::InvalidIdentifierType(_) => error_codes::INVALID_PARAMS,
        _ => error_codes::VALIDATION_ERROR,
    }
}

fn analytics_error_code(error: &AnalyticsError) -> i32 {
    match error {
        AnalyticsError::AmbiguousIdentifier { .. } => error_codes::AMBIGUOUS_IDENTIFIER,
        AnalyticsError::Domain(e) => domain_error_code(e),
        AnalyticsError::DateOutOfRange(_) => error_codes::INTERNAL_ERROR,
        AnalyticsError::Storage(e) => storage_error_code(e),
    }
}

fn storage_error_code(error: &StorageError) -> i32 {
    match error {
        StorageError::HabitNotFound { .. } => error_codes::HABIT_NOT_FOUND,
        StorageError::Domain(e) => domain_error_code(e),
        StorageError::Query(_) | StorageError::Connection(_) | StorageError::Migration(_) => {
            error_codes::STORAGE_ERROR
        }
    }
}

fn definition<T: JsonSchema>(name: &str, description: &str) -> Result<ToolDefinition, serde_json::Error> {
    Ok(ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema_for!(T))?,
    })
}

/// Every tool the server offers, with schemas generated from the parameter types
pub fn tool_definitions() -> Result<Vec<ToolDefinition>, serde_json::Error> {
    Ok(vec![
        definition::<AddHabitParams>(
            "habit_add",
            "Add a new habit with a daily, weekly or monthly periodicity",
        )?,
        definition::<UpdateHabitParams>(
            "habit_update",
            "Change the name, description or periodicity of a habit",
        )?,
        definition::<DeleteHabitParams>(
            "habit_delete",
            "Delete a habit and all of its completions",
        )?,
        definition::<CheckoffParams>("habit_checkoff", "Mark a habit as completed right now")?,
        definition::<ListHabitsParams>(
            "habit_list",
            "List habits with their status and deadline for the current period",
        )?,
        definition::<StreakParams>(
            "habit_streak",
            "Longest run of consecutive completion days for one habit or across all habits",
        )?,
        definition::<GapsParams>(
            "habit_gaps",
            "Breaks and missed days between completions of a habit",
        )?,
        definition::<StruggleParams>(
            "habit_struggle",
            "Rank habits by struggle score (breaks plus gap days, higher is worse)",
        )?,
        definition::<SummaryParams>(
            "habit_summary",
            "Overview of all habits: completion per periodicity, best and most struggled habit",
        )?,
    ])
}
