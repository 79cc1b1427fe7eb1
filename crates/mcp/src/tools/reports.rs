// Pivot report tool.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    failure_envelope, json_schema_array, json_schema_object, json_schema_result_type,
    json_schema_string, success_envelope, ResultType, Tool,
};
use anyhow::{Context, Result};
use hap_api::HapClient;
use hap_core::{render_pivot_json, render_pivot_table};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Cross-tabulated report: row/column group-bys against aggregated values.
pub struct GetPivotDataTool {
    client: Arc<HapClient>,
}

impl GetPivotDataTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPivotDataArgs {
    worksheet_id: String,
    #[serde(default)]
    rows: Vec<Value>,
    #[serde(default)]
    columns: Vec<Value>,
    values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Value>,
    #[serde(default, rename = "result_type", skip_serializing)]
    result_type: ResultType,
}

#[async_trait::async_trait]
impl Tool for GetPivotDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_pivot_data".to_string(),
            description: "Get pivot table data: group worksheet records by row and column fields and aggregate value fields".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rows": json_schema_array(
                        json!({"type": "object"}),
                        "Row group-by fields: {controlId, displayName} entries",
                    ),
                    "columns": json_schema_array(
                        json!({"type": "object"}),
                        "Column group-by fields: {controlId, displayName} entries",
                    ),
                    "values": json_schema_array(
                        json!({"type": "object"}),
                        "Aggregated value fields: {controlId, displayName, aggregation} entries",
                    ),
                    "filters": json_schema_array(
                        json!({"type": "object"}),
                        "Filter condition objects, same shape as list_worksheet_records",
                    ),
                    "result_type": json_schema_result_type(),
                }),
                vec!["worksheetId", "values"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetPivotDataArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_pivot_data")?;
        let payload = serde_json::to_value(&args)?;
        let data = match self.client.reports().pivot_data(payload).await {
            Ok(data) => data,
            Err(err) => return Ok(failure_envelope(err)),
        };
        let result = match args.result_type {
            ResultType::Table => json!({ "report": render_pivot_table(&data) }),
            ResultType::Json => render_pivot_json(&data),
        };
        Ok(success_envelope(result))
    }
}
