//! Report endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde_json::Value;

/// Pivot-report data. Lives on its own API host.
pub struct ReportsApi<'a> {
    client: &'a HapClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    pub async fn pivot_data(&self, payload: Value) -> HapResult<Value> {
        let url = self.client.http.report_url();
        self.client.http.post_url(&url, payload).await
    }
}
