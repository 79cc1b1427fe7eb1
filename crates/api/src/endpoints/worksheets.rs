//! Worksheet structure endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde_json::{json, Value};

/// Worksheet creation and structure lookup.
pub struct WorksheetsApi<'a> {
    client: &'a HapClient,
}

impl<'a> WorksheetsApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    /// Worksheet structure: controls, views, configuration.
    pub async fn info(&self, worksheet_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/worksheet/getWorksheetInfo",
                json!({ "worksheetId": worksheet_id }),
            )
            .await
    }

    /// The raw control definitions of a worksheet, or an empty list when the
    /// structure document carries none.
    pub async fn controls(&self, worksheet_id: &str) -> HapResult<Vec<Value>> {
        let info = self.info(worksheet_id).await?;
        Ok(info
            .get("controls")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Create a worksheet from control definitions.
    pub async fn create(&self, payload: Value) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/worksheet/addWorksheet", payload)
            .await
    }
}
