//! Application-level endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde_json::{json, Value};

/// Application structure and reference-data endpoints.
pub struct AppApi<'a> {
    client: &'a HapClient,
}

impl<'a> AppApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    /// Application information: groups, worksheets and custom pages.
    pub async fn info(&self) -> HapResult<Value> {
        self.client.http.get("/v1/open/app/get", &[]).await
    }

    /// Geographical area reference data.
    pub async fn area_info(&self) -> HapResult<Value> {
        self.client.http.post("/v2/open/area/get", json!({})).await
    }
}
