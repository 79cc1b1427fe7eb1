// Shared option set tools.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_array, json_schema_number, json_schema_object, json_schema_string, respond, Tool,
};
use anyhow::{Context, Result};
use hap_api::HapClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Option set creation.
pub struct CreateOptionSetTool {
    client: Arc<HapClient>,
}

impl CreateOptionSetTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOptionSetArgs {
    name: String,
    options: Vec<Value>,
    #[serde(rename = "type")]
    set_type: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for CreateOptionSetTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_option_set".to_string(),
            description: "Create a new option set".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Option set name"),
                    "options": json_schema_array(
                        json!({"type": "object"}),
                        "Array of options: {key, value, color, index}",
                    ),
                    "type": json_schema_number("Option set type"),
                }),
                vec!["name", "options"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CreateOptionSetArgs =
            serde_json::from_value(arguments).context("Invalid arguments for create_option_set")?;
        let mut payload = json!({
            "name": args.name,
            "options": args.options,
        });
        if let Some(set_type) = args.set_type {
            payload["type"] = json!(set_type);
        }
        respond(self.client.option_sets().create(payload).await)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionSetIdArgs {
    option_set_id: String,
}

/// Option set lookup.
pub struct GetOptionSetTool {
    client: Arc<HapClient>,
}

impl GetOptionSetTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetOptionSetTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_option_set".to_string(),
            description: "Get option set information".to_string(),
            input_schema: json_schema_object(
                json!({ "optionSetId": json_schema_string("Option set ID") }),
                vec!["optionSetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: OptionSetIdArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_option_set")?;
        respond(self.client.option_sets().get(&args.option_set_id).await)
    }
}

/// Option set update.
pub struct UpdateOptionSetTool {
    client: Arc<HapClient>,
}

impl UpdateOptionSetTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateOptionSetArgs {
    option_set_id: String,
    name: Option<String>,
    options: Option<Vec<Value>>,
}

#[async_trait::async_trait]
impl Tool for UpdateOptionSetTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_option_set".to_string(),
            description: "Update an existing option set".to_string(),
            input_schema: json_schema_object(
                json!({
                    "optionSetId": json_schema_string("Option set ID"),
                    "name": json_schema_string("New option set name"),
                    "options": json_schema_array(
                        json!({"type": "object"}),
                        "Updated array of options: {key, value, color, index}",
                    ),
                }),
                vec!["optionSetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: UpdateOptionSetArgs =
            serde_json::from_value(arguments).context("Invalid arguments for update_option_set")?;
        let mut payload = json!({ "optionSetId": args.option_set_id });
        if let Some(name) = args.name {
            payload["name"] = json!(name);
        }
        if let Some(options) = args.options {
            payload["options"] = json!(options);
        }
        respond(self.client.option_sets().update(payload).await)
    }
}

/// Option set deletion.
pub struct DeleteOptionSetTool {
    client: Arc<HapClient>,
}

impl DeleteOptionSetTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteOptionSetTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_option_set".to_string(),
            description: "Delete an option set".to_string(),
            input_schema: json_schema_object(
                json!({ "optionSetId": json_schema_string("Option set ID to delete") }),
                vec!["optionSetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: OptionSetIdArgs =
            serde_json::from_value(arguments).context("Invalid arguments for delete_option_set")?;
        respond(self.client.option_sets().delete(&args.option_set_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_args_accept_type_keyword() {
        let args: CreateOptionSetArgs = serde_json::from_value(json!({
            "name": "Priorities",
            "options": [{"key": "p1", "value": "High", "index": 0}],
            "type": 1
        }))
        .unwrap();
        assert_eq!(args.set_type, Some(1));
    }

    #[test]
    fn test_update_args_are_partial() {
        let args: UpdateOptionSetArgs =
            serde_json::from_value(json!({"optionSetId": "os1", "name": "Renamed"})).unwrap();
        assert_eq!(args.name.as_deref(), Some("Renamed"));
        assert!(args.options.is_none());
    }
}
