//! MCP (Model Context Protocol) handler
//!
//! Implements a JSON-RPC style MCP server for AI model integration.
//! Uses sealed traits to control which tools can be registered.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::dispatcher::{CommandOutput, Dispatcher};
use crate::error::{Error, ErrorContext, Result};
use crate::render::render;
use crate::store::ItemStore;

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ============================================================================
// Sealed Trait Pattern - Prevents external implementations
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Trait for MCP tools - sealed to prevent external implementations
#[async_trait]
pub trait Tool: sealed::Sealed + Send + Sync {
    /// Tool name
    fn name(&self) -> &'static str;

    /// Tool description for the AI model
    fn description(&self) -> &'static str;

    /// JSON schema for input parameters
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given parameters
    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput>;
}

/// What a tool hands back: text for the model plus the structured projection
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub structured: serde_json::Value,
}

// ============================================================================
// MCP Protocol Types
// ============================================================================

/// MCP request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl McpRequest {
    /// Requests without an `id` are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP error structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// JSON-RPC error codes used by the handler
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const TOOL_ERROR: i32 = -32000;
}

impl McpResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// Arguments of the `hn` tool
#[derive(Debug, Clone, Deserialize)]
struct HnArgs {
    command: String,
    #[serde(default, deserialize_with = "string_or_absent")]
    param: Option<String>,
}

/// A non-string `param` (number, bool, object) is treated as not given
fn string_or_absent<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_owned)))
}

/// The single Hacker News browsing tool
pub struct HackerNewsTool<S: ?Sized> {
    dispatcher: Arc<Dispatcher<S>>,
}

impl<S: ?Sized> sealed::Sealed for HackerNewsTool<S> {}

#[async_trait]
impl<S> Tool for HackerNewsTool<S>
where
    S: ItemStore + ?Sized + 'static,
{
    fn name(&self) -> &'static str {
        "hn"
    }

    fn description(&self) -> &'static str {
        "Browse Hacker News. Commands: latest, top, best (story listings, param --N for \
         1-50 stories, default 10), history (story detail, param --<story id>), comments \
         (direct comments, param --<position in last listing> or --<story id>)."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Command to run (latest, top, best, history, comments)"
                },
                "param": {
                    "type": "string",
                    "description": "Optional parameter, a number prefixed by -- (e.g. --10, --3, --12345678)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput> {
        let args: HnArgs = serde_json::from_value(params).map_err(|e| Error::InvalidRequest {
            message: format!("Invalid 'hn' arguments: {}", e),
        })?;

        let output: CommandOutput = self
            .dispatcher
            .dispatch(&args.command, args.param.as_deref())
            .await?;

        Ok(ToolOutput {
            text: render(&output),
            structured: serde_json::to_value(&output).with_context("command output")?,
        })
    }
}

// ============================================================================
// MCP Handler
// ============================================================================

/// MCP request handler
pub struct McpHandler {
    tools: BTreeMap<String, Box<dyn Tool>>,
    server_info: ServerInfo,
}

#[derive(Clone, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

impl McpHandler {
    /// Create a new MCP handler around a dispatcher
    pub fn new<S>(dispatcher: Dispatcher<S>) -> Self
    where
        S: ItemStore + ?Sized + 'static,
    {
        let mut tools: BTreeMap<String, Box<dyn Tool>> = BTreeMap::new();

        let hn_tool = HackerNewsTool {
            dispatcher: Arc::new(dispatcher),
        };
        tools.insert(hn_tool.name().to_string(), Box::new(hn_tool));

        Self {
            tools,
            server_info: ServerInfo {
                name: "hn-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Handle an MCP request; notifications produce no response
    pub async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => McpResponse::success(request.id, serde_json::json!({})),
            "tools/list" => self.handle_list_tools(request.id),
            "tools/call" => self.handle_call_tool(request.id, request.params).await,
            other => {
                warn!(method = %other, "Unsupported method");
                McpResponse::error(request.id, codes::METHOD_NOT_FOUND, "Method not found")
            }
        };
        Some(response)
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: Option<serde_json::Value>) -> McpResponse {
        McpResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": self.server_info,
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    /// Handle tools/list request
    fn handle_list_tools(&self, id: Option<serde_json::Value>) -> McpResponse {
        let tools: Vec<serde_json::Value> = self
            .tools
            .values()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema()
                })
            })
            .collect();

        McpResponse::success(id, serde_json::json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_call_tool(
        &self,
        id: Option<serde_json::Value>,
        params: serde_json::Value,
    ) -> McpResponse {
        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => return McpResponse::error(id, codes::INVALID_PARAMS, "Missing tool name"),
        };

        let tool = match self.tools.get(tool_name) {
            Some(tool) => tool,
            None => {
                let err = Error::UnknownTool {
                    name: tool_name.to_string(),
                };
                return McpResponse::error(id, codes::INVALID_PARAMS, err.to_string());
            }
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        match tool.execute(arguments).await {
            Ok(output) => McpResponse::success(
                id,
                serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": output.text
                    }],
                    "structuredContent": output.structured
                }),
            ),
            Err(e) => {
                if e.is_caller_error() {
                    warn!(tool = tool_name, error = %e, "Tool call rejected");
                } else {
                    error!(tool = tool_name, error = %e, "Tool call failed");
                }
                McpResponse::error(id, codes::TOOL_ERROR, e.to_string())
            }
        }
    }

    /// Parse and handle a JSON request string
    ///
    /// Returns `None` for notifications, which must not be answered.
    /// Handle one raw input line. Bytes that are not UTF-8 get a parse error.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<String> {
        match std::str::from_utf8(line) {
            Ok(json) => self.handle_json(json).await,
            Err(e) => {
                let response =
                    McpResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {}", e));
                serde_json::to_string(&response).ok()
            }
        }
    }

    pub async fn handle_json(&self, json: &str) -> Option<String> {
        let request: McpRequest = match serde_json::from_str(json) {
            Ok(req) => req,
            Err(e) => {
                let response =
                    McpResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {}", e));
                return serde_json::to_string(&response).ok();
            }
        };

        let response = self.handle(request).await?;
        match serde_json::to_string(&response) {
            Ok(line) => Some(line),
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                None
            }
        }
    }
}
