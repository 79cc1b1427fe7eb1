// MCP server: one JSON-RPC message per line on stdin, one response per line
// on stdout. Logging goes to stderr; stdout belongs to the protocol.

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Serve requests until stdin closes.
    pub async fn start(&self) -> Result<()> {
        info!(tools = self.registry.len(), "MCP server listening on stdio");

        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(line).await else {
                continue;
            };
            let serialized = serde_json::to_string(&response)?;
            stdout.write_all(serialized.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one incoming line. Notifications produce no response.
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(err.to_string()),
                ))
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "notification acknowledged");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let params = request.params.unwrap_or_else(|| json!({}));
        Some(self.handle_request(id, &request.method, params).await)
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> JsonRpcResponse {
        match method {
            "initialize" => respond_with(id, InitializeResult::current()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => respond_with(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => {
                let params: CallToolParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(err) => {
                        return JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params(err.to_string()),
                        )
                    }
                };
                let Some(tool) = self.registry.get(&params.name) else {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
                    );
                };
                debug!(tool = %params.name, "tool call");
                // Tool-level failures stay inside the tool result; only
                // protocol problems become JSON-RPC errors.
                let result = match tool.execute(params.arguments).await {
                    Ok(result) => result,
                    Err(err) => CallToolResult::error(format!("Error: {}", err)),
                };
                respond_with(id, result)
            }
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }
}

fn respond_with(id: Value, result: impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(err) => JsonRpcResponse::error(id, JsonRpcError::internal_error(err.to_string())),
    }
}
