// Application-level tools: app structure, worksheet index, area data.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    failure_envelope, json_schema_object, json_schema_result_type, respond, success_envelope,
    ResultType, Tool,
};
use anyhow::{Context, Result};
use hap_api::HapClient;
use hap_core::{flatten_worksheets, worksheet_table};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Raw application structure: groups, worksheets and custom pages.
pub struct GetAppInfoTool {
    client: Arc<HapClient>,
}

impl GetAppInfoTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetAppInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_app_info".to_string(),
            description:
                "Get application information including groups, worksheets, and custom pages"
                    .to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        respond(self.client.app().info().await)
    }
}

/// Flattened worksheet index built from the application's section tree.
pub struct ListWorksheetsTool {
    client: Arc<HapClient>,
}

impl ListWorksheetsTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListWorksheetsArgs {
    #[serde(default)]
    result_type: ResultType,
}

#[async_trait::async_trait]
impl Tool for ListWorksheetsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_worksheets".to_string(),
            description: "List all worksheets in the application as a flat index of worksheetId, name and description".to_string(),
            input_schema: json_schema_object(
                json!({ "result_type": json_schema_result_type() }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ListWorksheetsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for list_worksheets")?;

        let app_info = match self.client.app().info().await {
            Ok(info) => info,
            Err(err) => return Ok(failure_envelope(err)),
        };
        let entries = flatten_worksheets(&app_info);
        let worksheets = match args.result_type {
            ResultType::Table => Value::String(worksheet_table(&entries)),
            ResultType::Json => serde_json::to_value(&entries)?,
        };
        Ok(success_envelope(json!({
            "total": entries.len(),
            "worksheets": worksheets,
        })))
    }
}

/// Geographical area reference data.
pub struct GetAreaInfoTool {
    client: Arc<HapClient>,
}

impl GetAreaInfoTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetAreaInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_area_info".to_string(),
            description: "Get geographical area information".to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        respond(self.client.app().area_info().await)
    }
}
