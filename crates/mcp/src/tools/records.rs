// Row record tools: decoded listing, CRUD, batches and per-row metadata.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    failure_envelope, json_schema_array, json_schema_boolean, json_schema_number,
    json_schema_object, json_schema_result_type, json_schema_string, respond, success_envelope,
    ResultType, Tool,
};
use anyhow::{Context, Result};
use hap_api::{HapClient, ListRecordsQuery};
use hap_core::{build_row_schema, render_rows, render_table};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn default_page_size() -> u32 {
    50
}

fn default_page_index() -> u32 {
    1
}

fn default_log_page_size() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

/// Filtered row listing, decoded against the worksheet's field catalog.
pub struct ListWorksheetRecordsTool {
    client: Arc<HapClient>,
}

impl ListWorksheetRecordsTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWorksheetRecordsArgs {
    worksheet_id: String,
    view_id: Option<String>,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_index")]
    page_index: u32,
    key_words: Option<String>,
    sort_id: Option<String>,
    #[serde(default)]
    is_asc: bool,
    /// Comma-separated allow list of field ids; blank or absent keeps every
    /// renderable field.
    field_ids: Option<String>,
    #[serde(default)]
    filters: Vec<Value>,
    #[serde(default)]
    not_get_total: bool,
    #[serde(default, rename = "result_type")]
    result_type: ResultType,
}

#[async_trait::async_trait]
impl Tool for ListWorksheetRecordsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_worksheet_records".to_string(),
            description: "Get worksheet records with filtering, sorting and pagination. Cell values are decoded to readable text: member/department/organization references become names, option keys become labels, linked records become their title field".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "viewId": json_schema_string("View ID for filtering"),
                    "pageSize": json_schema_number("Number of records per page (max 1000, default 50)"),
                    "pageIndex": json_schema_number("Page number (default 1)"),
                    "keyWords": json_schema_string("Keywords for fuzzy search"),
                    "sortId": json_schema_string("Field ID for sorting"),
                    "isAsc": json_schema_boolean("Sort in ascending order"),
                    "fieldIds": json_schema_string("Comma-separated field IDs to return; empty returns all renderable fields"),
                    "filters": json_schema_array(
                        json!({"type": "object"}),
                        "Filter condition objects: controlId, dataType, spliceType (1=And, 2=Or), filterType, and values/value per field type",
                    ),
                    "notGetTotal": json_schema_boolean("Skip total count for better performance"),
                    "result_type": json_schema_result_type(),
                }),
                vec!["worksheetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ListWorksheetRecordsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for list_worksheet_records")?;

        let controls = match self.client.worksheets().controls(&args.worksheet_id).await {
            Ok(controls) => controls,
            Err(err) => return Ok(failure_envelope(err)),
        };
        let schema = build_row_schema(&controls, args.field_ids.as_deref());

        let query = ListRecordsQuery {
            worksheet_id: args.worksheet_id,
            view_id: args.view_id,
            page_size: args.page_size,
            page_index: args.page_index,
            key_words: args.key_words,
            sort_id: args.sort_id,
            is_asc: args.is_asc,
            controls: schema.remote_field_ids(),
            filters: args.filters,
            not_get_total: args.not_get_total,
        };
        let data = match self.client.records().list(&query).await {
            Ok(data) => data,
            Err(err) => return Ok(failure_envelope(err)),
        };

        let rows = data
            .get("rows")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let total = data
            .get("total")
            .and_then(Value::as_i64)
            .unwrap_or(rows.len() as i64);

        let rendered = match args.result_type {
            ResultType::Table => Value::String(render_table(&schema, &rows)),
            ResultType::Json => Value::Array(render_rows(&schema, &rows)),
        };
        Ok(success_envelope(json!({
            "total": total,
            "pageIndex": args.page_index,
            "pageSize": args.page_size,
            "rows": rendered,
        })))
    }
}

/// Single row by id, raw document.
pub struct GetRecordDetailTool {
    client: Arc<HapClient>,
}

impl GetRecordDetailTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRecordDetailArgs {
    worksheet_id: String,
    row_id: String,
    #[serde(default)]
    get_system_control: bool,
}

#[async_trait::async_trait]
impl Tool for GetRecordDetailTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_record_detail".to_string(),
            description: "Get detailed information of a specific row record".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID"),
                    "getSystemControl": json_schema_boolean("Include system fields"),
                }),
                vec!["worksheetId", "rowId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetRecordDetailArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_record_detail")?;
        respond(
            self.client
                .records()
                .detail(&args.worksheet_id, &args.row_id, args.get_system_control)
                .await,
        )
    }
}

/// Row creation.
pub struct AddRecordTool {
    client: Arc<HapClient>,
}

impl AddRecordTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRecordArgs {
    worksheet_id: String,
    controls: Vec<Value>,
    #[serde(default = "default_true")]
    trigger_workflow: bool,
}

#[async_trait::async_trait]
impl Tool for AddRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_record".to_string(),
            description: "Create a new row record in worksheet".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "controls": json_schema_array(
                        json!({"type": "object"}),
                        "Control data for the new record: {controlId, value} pairs",
                    ),
                    "triggerWorkflow": json_schema_boolean("Whether to trigger workflow"),
                }),
                vec!["worksheetId", "controls"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AddRecordArgs =
            serde_json::from_value(arguments).context("Invalid arguments for add_record")?;
        respond(
            self.client
                .records()
                .add(json!({
                    "worksheetId": args.worksheet_id,
                    "controls": args.controls,
                    "triggerWorkflow": args.trigger_workflow,
                }))
                .await,
        )
    }
}

/// Row update.
pub struct UpdateRecordTool {
    client: Arc<HapClient>,
}

impl UpdateRecordTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRecordArgs {
    worksheet_id: String,
    row_id: String,
    controls: Vec<Value>,
    #[serde(default = "default_true")]
    trigger_workflow: bool,
}

#[async_trait::async_trait]
impl Tool for UpdateRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_record".to_string(),
            description: "Update an existing row record in worksheet".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID to update"),
                    "controls": json_schema_array(
                        json!({"type": "object"}),
                        "Control data to update: {controlId, value} pairs",
                    ),
                    "triggerWorkflow": json_schema_boolean("Whether to trigger workflow"),
                }),
                vec!["worksheetId", "rowId", "controls"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: UpdateRecordArgs =
            serde_json::from_value(arguments).context("Invalid arguments for update_record")?;
        respond(
            self.client
                .records()
                .update(json!({
                    "worksheetId": args.worksheet_id,
                    "rowId": args.row_id,
                    "controls": args.controls,
                    "triggerWorkflow": args.trigger_workflow,
                }))
                .await,
        )
    }
}

/// Row deletion, logical by default.
pub struct DeleteRecordTool {
    client: Arc<HapClient>,
}

impl DeleteRecordTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRecordArgs {
    worksheet_id: String,
    row_id: String,
    #[serde(default = "default_true")]
    trigger_workflow: bool,
    #[serde(default)]
    thorough_delete: bool,
}

#[async_trait::async_trait]
impl Tool for DeleteRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_record".to_string(),
            description: "Delete a row record from worksheet".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID to delete"),
                    "triggerWorkflow": json_schema_boolean("Whether to trigger workflow"),
                    "thoroughDelete": json_schema_boolean("Permanently delete (true) or logical delete (false)"),
                }),
                vec!["worksheetId", "rowId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: DeleteRecordArgs =
            serde_json::from_value(arguments).context("Invalid arguments for delete_record")?;
        // The platform spells this one parameter in PascalCase.
        respond(
            self.client
                .records()
                .delete(json!({
                    "worksheetId": args.worksheet_id,
                    "rowId": args.row_id,
                    "triggerWorkflow": args.trigger_workflow,
                    "ThoroughDelete": args.thorough_delete,
                }))
                .await,
        )
    }
}

/// Batch row creation.
pub struct AddRecordsBatchTool {
    client: Arc<HapClient>,
}

impl AddRecordsBatchTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRecordsBatchArgs {
    worksheet_id: String,
    rows: Vec<Value>,
    #[serde(default = "default_true")]
    trigger_workflow: bool,
    #[serde(default)]
    return_row_ids: bool,
}

#[async_trait::async_trait]
impl Tool for AddRecordsBatchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_records_batch".to_string(),
            description: "Create multiple row records in worksheet at once".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rows": json_schema_array(
                        json!({"type": "array", "items": {"type": "object"}}),
                        "Array of row data, each row is an array of {controlId, value} pairs",
                    ),
                    "triggerWorkflow": json_schema_boolean("Whether to trigger workflow"),
                    "returnRowIds": json_schema_boolean("Return row IDs instead of count"),
                }),
                vec!["worksheetId", "rows"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AddRecordsBatchArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for add_records_batch")?;
        respond(
            self.client
                .records()
                .add_batch(json!({
                    "worksheetId": args.worksheet_id,
                    "rows": args.rows,
                    "triggerWorkflow": args.trigger_workflow,
                    "ReturnRowIds": args.return_row_ids,
                }))
                .await,
        )
    }
}

/// Batch row update, same control values applied to every row.
pub struct UpdateRecordsBatchTool {
    client: Arc<HapClient>,
}

impl UpdateRecordsBatchTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRecordsBatchArgs {
    worksheet_id: String,
    row_ids: Vec<String>,
    controls: Vec<Value>,
    #[serde(default = "default_true")]
    trigger_workflow: bool,
}

#[async_trait::async_trait]
impl Tool for UpdateRecordsBatchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_records_batch".to_string(),
            description: "Update multiple row records in worksheet at once".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowIds": json_schema_array(json!({"type": "string"}), "Array of row IDs to update"),
                    "controls": json_schema_array(
                        json!({"type": "object"}),
                        "Control data to update for all rows: {controlId, value} pairs",
                    ),
                    "triggerWorkflow": json_schema_boolean("Whether to trigger workflow"),
                }),
                vec!["worksheetId", "rowIds", "controls"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: UpdateRecordsBatchArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for update_records_batch")?;
        respond(
            self.client
                .records()
                .update_batch(json!({
                    "worksheetId": args.worksheet_id,
                    "rowIds": args.row_ids,
                    "controls": args.controls,
                    "triggerWorkflow": args.trigger_workflow,
                }))
                .await,
        )
    }
}

/// One page of records linked through a relation control.
pub struct GetRelatedRecordsTool {
    client: Arc<HapClient>,
}

impl GetRelatedRecordsTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRelatedRecordsArgs {
    worksheet_id: String,
    row_id: String,
    control_id: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_index")]
    page_index: u32,
}

#[async_trait::async_trait]
impl Tool for GetRelatedRecordsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_related_records".to_string(),
            description: "Get related records from linked worksheets".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID"),
                    "controlId": json_schema_string("Related control ID"),
                    "pageSize": json_schema_number("Number of records per page (default 50)"),
                    "pageIndex": json_schema_number("Page number (default 1)"),
                }),
                vec!["worksheetId", "rowId", "controlId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetRelatedRecordsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_related_records")?;
        respond(
            self.client
                .records()
                .related(json!({
                    "worksheetId": args.worksheet_id,
                    "rowId": args.row_id,
                    "controlId": args.control_id,
                    "pageSize": args.page_size,
                    "pageIndex": args.page_index,
                }))
                .await,
        )
    }
}

/// Sharing link for one row.
pub struct GetRecordShareLinkTool {
    client: Arc<HapClient>,
}

impl GetRecordShareLinkTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRecordShareLinkArgs {
    worksheet_id: String,
    row_id: String,
    valid_time: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for GetRecordShareLinkTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_record_share_link".to_string(),
            description: "Get sharing link for a record".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID"),
                    "validTime": json_schema_number("Link validity time in hours"),
                }),
                vec!["worksheetId", "rowId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetRecordShareLinkArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_record_share_link")?;
        let mut payload = json!({
            "worksheetId": args.worksheet_id,
            "rowId": args.row_id,
        });
        if let Some(valid_time) = args.valid_time {
            payload["validTime"] = json!(valid_time);
        }
        respond(self.client.records().share_link(payload).await)
    }
}

/// Worksheet row total.
pub struct GetRecordCountTool {
    client: Arc<HapClient>,
}

impl GetRecordCountTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRecordCountArgs {
    worksheet_id: String,
}

#[async_trait::async_trait]
impl Tool for GetRecordCountTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_record_count".to_string(),
            description: "Get total number of rows in worksheet".to_string(),
            input_schema: json_schema_object(
                json!({ "worksheetId": json_schema_string("Worksheet ID") }),
                vec!["worksheetId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetRecordCountArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_record_count")?;
        respond(self.client.records().count(&args.worksheet_id).await)
    }
}

/// Operation logs of one row, one page.
pub struct GetRecordLogsTool {
    client: Arc<HapClient>,
}

impl GetRecordLogsTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRecordLogsArgs {
    worksheet_id: String,
    row_id: String,
    #[serde(default = "default_log_page_size")]
    page_size: u32,
    #[serde(default = "default_page_index")]
    page_index: u32,
}

#[async_trait::async_trait]
impl Tool for GetRecordLogsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_record_logs".to_string(),
            description: "Get operation logs for a specific row record".to_string(),
            input_schema: json_schema_object(
                json!({
                    "worksheetId": json_schema_string("Worksheet ID"),
                    "rowId": json_schema_string("Row record ID"),
                    "pageSize": json_schema_number("Number of logs per page (default 20)"),
                    "pageIndex": json_schema_number("Page number (default 1)"),
                }),
                vec!["worksheetId", "rowId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: GetRecordLogsArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_record_logs")?;
        respond(
            self.client
                .records()
                .logs(json!({
                    "worksheetId": args.worksheet_id,
                    "rowId": args.row_id,
                    "pageSize": args.page_size,
                    "pageIndex": args.page_index,
                }))
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolContent;
    use hap_api::ApiConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope(result: &CallToolResult) -> Value {
        let ToolContent::Text { text } = &result.content[0];
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_list_args_defaults() {
        let args: ListWorksheetRecordsArgs =
            serde_json::from_value(json!({"worksheetId": "ws1"})).unwrap();
        assert_eq!(args.page_size, 50);
        assert_eq!(args.page_index, 1);
        assert!(!args.is_asc);
        assert!(args.filters.is_empty());
        assert_eq!(args.result_type, ResultType::Table);
    }

    #[test]
    fn test_delete_args_defaults() {
        let args: DeleteRecordArgs =
            serde_json::from_value(json!({"worksheetId": "ws1", "rowId": "r1"})).unwrap();
        assert!(args.trigger_workflow);
        assert!(!args.thorough_delete);
    }

    #[tokio::test]
    async fn test_list_records_decodes_rows_into_table() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/open/worksheet/getWorksheetInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 1,
                "data": {
                    "controls": [
                        {"controlId": "title", "controlName": "Title", "type": 2},
                        {"controlId": "owner", "controlName": "Owner", "type": 26}
                    ]
                }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v2/open/worksheet/getFilterRows"))
            .and(body_partial_json(json!({
                "worksheetId": "ws1",
                "controls": ["title", "owner"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 1,
                "data": {
                    "total": 1,
                    "rows": [{
                        "rowid": "r1",
                        "ctime": "2024-05-01 09:00:00",
                        "title": "First",
                        "owner": "[{\"accountId\":\"a1\",\"fullname\":\"Alice\"}]"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let config = ApiConfig::new("k", "s").with_host(server.uri());
        let client = Arc::new(HapClient::new(config).unwrap());
        let tool = ListWorksheetRecordsTool::new(client);

        let result = tool
            .execute(json!({"worksheetId": "ws1"}))
            .await
            .unwrap();
        let doc = envelope(&result);
        assert_eq!(doc["success"], json!(true));
        assert_eq!(doc["result"]["total"], json!(1));
        let table = doc["result"]["rows"].as_str().unwrap();
        assert!(table.starts_with("|Title|Owner|Created Time|Record Row ID|"));
        assert!(table.contains("|First|Alice|2024-05-01 09:00:00|r1|"));
    }

    #[tokio::test]
    async fn test_list_records_surfaces_upstream_error_in_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/open/worksheet/getWorksheetInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 10101,
                "error_msg": "invalid appkey"
            })))
            .mount(&server)
            .await;

        let config = ApiConfig::new("bad", "bad").with_host(server.uri());
        let client = Arc::new(HapClient::new(config).unwrap());
        let tool = ListWorksheetRecordsTool::new(client);

        let result = tool
            .execute(json!({"worksheetId": "ws1"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        let doc = envelope(&result);
        assert_eq!(doc["success"], json!(false));
        assert!(doc["error"].as_str().unwrap().contains("invalid appkey"));
    }
}
