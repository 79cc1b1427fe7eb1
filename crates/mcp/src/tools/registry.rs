// Tool trait, registry and the shared response envelope.

use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait. Implementations are stateless apart from the shared
/// API client they hold.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments.
    async fn execute(&self, arguments: Value) -> Result<CallToolResult>;
}

/// Tool registry for managing available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name for a stable `tools/list`.
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Successful tool response: `{success: true, result}` as pretty JSON text.
pub fn success_envelope(result: Value) -> CallToolResult {
    CallToolResult::text(pretty(&json!({
        "success": true,
        "result": result,
    })))
}

/// Failed tool response: `{success: false, error}`. Upstream and transport
/// failures are carried inside the envelope, never raised to the RPC layer.
pub fn failure_envelope(error: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::error(pretty(&json!({
        "success": false,
        "error": error.to_string(),
    })))
}

/// Fold an API outcome into the response envelope.
pub fn respond(result: hap_api::HapResult<Value>) -> Result<CallToolResult> {
    match result {
        Ok(data) => Ok(success_envelope(data)),
        Err(err) => Ok(failure_envelope(err)),
    }
}

/// Output encoding of listing and report tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Table,
    Json,
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

/// Schema of the shared `result_type` parameter of listing/report tools.
pub fn json_schema_result_type() -> Value {
    json!({
        "type": "string",
        "description": "Output encoding: \"table\" (markdown-style pipe table, default) or \"json\" (structured document)",
        "enum": ["table", "json"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolContent;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "echo".to_string(),
                input_schema: json_schema_object(json!({}), vec![]),
            }
        }

        async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
            Ok(success_envelope(arguments))
        }
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list_schemas()[0].name, "echo");
    }

    #[test]
    fn test_success_envelope_shape() {
        let result = success_envelope(json!({"n": 1}));
        let ToolContent::Text { text } = &result.content[0];
        let doc: Value = serde_json::from_str(text).unwrap();
        assert_eq!(doc["success"], json!(true));
        assert_eq!(doc["result"]["n"], json!(1));
        assert!(result.is_error.is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let result = failure_envelope("boom");
        let ToolContent::Text { text } = &result.content[0];
        let doc: Value = serde_json::from_str(text).unwrap();
        assert_eq!(doc["success"], json!(false));
        assert_eq!(doc["error"], json!("boom"));
        assert_eq!(result.is_error, Some(true));
    }
}
