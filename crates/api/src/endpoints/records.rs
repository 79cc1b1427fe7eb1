//! Row record endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde::Serialize;
use serde_json::Value;

/// Query surface of the filtered-listing endpoint. One page per call;
/// pagination orchestration is the caller's concern.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsQuery {
    pub worksheet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    pub page_size: u32,
    pub page_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_words: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_id: Option<String>,
    pub is_asc: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,
    /// Filter condition objects, passed through to the platform verbatim.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Value>,
    pub not_get_total: bool,
}

/// Row CRUD, batch operations, listings and per-row metadata.
pub struct RecordsApi<'a> {
    client: &'a HapClient,
}

impl<'a> RecordsApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    /// One page of filtered rows.
    pub async fn list(&self, query: &ListRecordsQuery) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/worksheet/getFilterRows",
                serde_json::to_value(query)?,
            )
            .await
    }

    /// Single row detail by id.
    pub async fn detail(
        &self,
        worksheet_id: &str,
        row_id: &str,
        get_system_control: bool,
    ) -> HapResult<Value> {
        self.client
            .http
            .get(
                "/v2/open/worksheet/getRowById",
                &[
                    ("worksheetId", worksheet_id.to_string()),
                    ("rowId", row_id.to_string()),
                    ("getSystemControl", get_system_control.to_string()),
                ],
            )
            .await
    }

    pub async fn add(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/worksheet/addRow", payload).await
    }

    pub async fn update(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/worksheet/editRow", payload).await
    }

    pub async fn delete(&self, payload: Value) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/worksheet/deleteRow", payload)
            .await
    }

    pub async fn add_batch(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/worksheet/addRows", payload).await
    }

    pub async fn update_batch(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/worksheet/editRows", payload).await
    }

    /// Records linked through a relation control, one page.
    pub async fn related(&self, payload: Value) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/worksheet/getRelationRows", payload)
            .await
    }

    /// Sharing link for one row.
    pub async fn share_link(&self, payload: Value) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/worksheet/getRowShareUrl", payload)
            .await
    }

    /// Total row count of a worksheet.
    pub async fn count(&self, worksheet_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/worksheet/getRowsCount",
                serde_json::json!({ "worksheetId": worksheet_id }),
            )
            .await
    }

    /// Operation logs of one row, one page.
    pub async fn logs(&self, payload: Value) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/worksheet/getRowLogs", payload)
            .await
    }
}
