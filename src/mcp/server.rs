/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes JSON-RPC responses to stdout

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::HabitStorage;
use crate::tools::{self, ToolError};
use crate::ServerError;

/// Source of the current local time
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Why a tools/call could not produce a tool result
enum CallFailure {
    UnknownTool(String),
    InvalidArguments(serde_json::Error),
    Tool(ToolError),
}

impl From<ToolError> for CallFailure {
    fn from(error: ToolError) -> Self {
        CallFailure::Tool(error)
    }
}

/// MCP server over some habit storage
pub struct McpServer<S: HabitStorage> {
    storage: S,
    clock: Clock,
    initialized: bool,
}

impl<S: HabitStorage> McpServer<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: local_now,
            initialized: false,
        }
    }

    /// Use a fixed source of "now" instead of the local clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;
                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle one line of input; `None` when no response is due
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            // Notifications never get a response
            if request.method.ends_with("initialized") {
                self.initialized = true;
            } else {
                debug!("Ignoring notification '{}'", request.method);
            }
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };
        Some(response)
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Analytics MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        respond(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        match tool_definitions() {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => internal_error(id, e),
        }
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        if !self.initialized {
            debug!("tools/call before the initialized notification");
        }

        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing parameters".to_string(),
                None,
            );
        };
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
        };

        let now = (self.clock)();
        debug!("Calling tool '{}' at {}", call.name, now);

        match self.call_tool(&call.name, call.arguments, now) {
            Ok(text) => respond(id, &ToolCallResult::success(text)),
            Err(CallFailure::Tool(e)) => {
                warn!("Tool '{}' failed: {}", call.name, e);
                respond(id, &ToolCallResult::error(&e))
            }
            Err(CallFailure::InvalidArguments(e)) => JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid arguments for '{}': {}", call.name, e),
                None,
            ),
            Err(CallFailure::UnknownTool(name)) => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", name),
                None,
            ),
        }
    }

    /// Run a tool and return the text shown to the user
    fn call_tool(&self, name: &str, args: Map<String, Value>, now: NaiveDateTime) -> Result<String, CallFailure> {
        let storage = &self.storage;
        let text = match name {
            "habit_add" => {
                let response = tools::add_habit(storage, arguments(args)?, now)?;
                format!("{}\nHabit ID: {}", response.message, response.habit_id)
            }
            "habit_update" => tools::update_habit(storage, arguments(args)?)?.message,
            "habit_delete" => tools::delete_habit(storage, arguments(args)?)?.message,
            "habit_checkoff" => tools::checkoff(storage, arguments(args)?, now)?.message,
            "habit_list" => tools::list_habits(storage, arguments(args)?, now)?.message,
            "habit_streak" => tools::longest_streak(storage, arguments(args)?)?.message,
            "habit_gaps" => tools::habit_gaps(storage, arguments(args)?)?.message,
            "habit_struggle" => tools::struggled_habits(storage, arguments(args)?)?.message,
            "habit_summary" => tools::habit_summary(storage, arguments(args)?, now)?.message,
            _ => return Err(CallFailure::UnknownTool(name.to_string())),
        };
        Ok(text)
    }
}

fn arguments<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, CallFailure> {
    serde_json::from_value(Value::Object(args)).map_err(CallFailure::InvalidArguments)
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => internal_error(id, e),
    }
}

fn internal_error(id: Value, e: serde_json::Error) -> JsonRpcResponse {
    error!("Failed to serialize response: {}", e);
    JsonRpcResponse::error(
        id,
        error_codes::INTERNAL_ERROR,
        format!("Failed to serialize response: {}", e),
        None,
    )
}
