// Worksheet structure tools: field catalog, raw structure, creation.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    failure_envelope, json_schema_array, json_schema_object, json_schema_result_type,
    json_schema_string, respond, success_envelope, ResultType, Tool,
};
use anyhow::{Context, Result};
use hap_api::HapClient;
use hap_core::build_catalog;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Field-type reference carried in the raw-structure tool description so the
/// model can interpret `type` codes without a second lookup.
const TYPE_REFERENCE: &str = "Field Type Reference: \
2=Text, 3=Text-Phone, 4=Text-Phone, 5=Text-Email, 6=Number, 7=Text, 8=Number, \
9=Option-Single Choice, 10=Option-Multiple Choices, 11=Option-Single Choice, \
15=Date, 16=Date, 24=Option-Region, 25=Text, 26=Option-Member, \
27=Option-Department, 28=Number, 29=Option-Linked Record, 30=Unknown Type, \
31=Number, 32=Text, 33=Text, 35=Option-Linked Record, 36=Number-Yes1/No0, \
37=Number, 38=Date, 40=Location, 41=Text, 46=Time, \
48=Option-Organizational Role, 50=Text, 51=Query Record";

/// Normalized field catalog of one worksheet.
pub struct GetWorksheetFieldsTool {
    client: Arc<HapClient>,
}

impl GetWorksheetFieldsTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetWorksheetFieldsArgs {
    worksheet_id: String,
    #[serde(default, rename = "result_type")]
    result_type: ResultType,
}

#[async_trait::async_trait]
impl Tool for GetWorksheetFieldsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_worksheet_fields".to_string(),
            description: "Get the normalized field catalog of a worksheet: fieldId, fieldName, field type, description and selectable options. Attachment, formula and other non-renderable fields are excluded".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "result_type": json_schema_result_type(),
                }),
                vec!["worksheetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetWorksheetFieldsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_worksheet_fields")?;

        let controls = match self.client.worksheets().controls(&args.worksheet_id).await {
            Ok(controls) => controls,
            Err(err) => return Ok(failure_envelope(err)),
        };
        let catalog = build_catalog(&controls);
        let fields = match args.result_type {
            ResultType::Table => Value::String(catalog.table),
            ResultType::Json => serde_json::to_value(&catalog.fields)?,
        };
        Ok(success_envelope(json!({ "fields": fields })))
    }
}

/// Raw worksheet structure, controls and configuration included.
pub struct GetWorksheetInfoTool {
    client: Arc<HapClient>,
}

impl GetWorksheetInfoTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetWorksheetInfoArgs {
    worksheet_id: String,
}

#[async_trait::async_trait]
impl Tool for GetWorksheetInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_worksheet_info".to_string(),
            description: format!(
                "Get worksheet structure information including controls and configuration. \
                 The response includes field type information where each field has a 'type' \
                 value corresponding to the following field types: {}",
                TYPE_REFERENCE
            ),
            input_schema: json_schema_object(
                json!({ "worksheetId": json_schema_string("Worksheet ID to get information for") }),
                vec!["worksheetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetWorksheetInfoArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_worksheet_info")?;
        respond(self.client.worksheets().info(&args.worksheet_id).await)
    }
}

/// Worksheet creation from control definitions.
pub struct CreateWorksheetTool {
    client: Arc<HapClient>,
}

impl CreateWorksheetTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorksheetArgs {
    name: String,
    alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_id: Option<String>,
    controls: Vec<Value>,
}

#[async_trait::async_trait]
impl Tool for CreateWorksheetTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_worksheet".to_string(),
            description: "Create a new worksheet with specified controls".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Worksheet name"),
                    "alias": json_schema_string("Worksheet alias"),
                    "sectionId": json_schema_string("Section ID to place the worksheet"),
                    "controls": json_schema_array(
                        json!({"type": "object"}),
                        "Control definitions: controlName, type (2:text, 6:number, 11:single select, 10:multi select, etc.), required, and per-type settings such as options, dot, enumDefault or dataSource",
                    ),
                }),
                vec!["name", "alias", "controls"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CreateWorksheetArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for create_worksheet")?;
        let payload = serde_json::to_value(&args)?;
        respond(self.client.worksheets().create(payload).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_args_accept_camel_case() {
        let args: GetWorksheetFieldsArgs =
            serde_json::from_value(json!({"worksheetId": "ws1", "result_type": "json"})).unwrap();
        assert_eq!(args.worksheet_id, "ws1");
        assert_eq!(args.result_type, ResultType::Json);
    }

    #[test]
    fn test_create_payload_omits_missing_section() {
        let args: CreateWorksheetArgs = serde_json::from_value(json!({
            "name": "Orders",
            "alias": "orders",
            "controls": [{"controlName": "Title", "type": 2, "required": true}]
        }))
        .unwrap();
        let payload = serde_json::to_value(&args).unwrap();
        assert_eq!(payload["name"], json!("Orders"));
        assert!(payload.get("sectionId").is_none());
    }
}
