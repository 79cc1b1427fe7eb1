//! Option set endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde_json::{json, Value};

/// Shared option set CRUD.
pub struct OptionSetsApi<'a> {
    client: &'a HapClient,
}

impl<'a> OptionSetsApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/optionSet/add", payload).await
    }

    pub async fn get(&self, option_set_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/optionSet/get",
                json!({ "optionSetId": option_set_id }),
            )
            .await
    }

    pub async fn update(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/optionSet/edit", payload).await
    }

    pub async fn delete(&self, option_set_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/optionSet/delete",
                json!({ "optionSetId": option_set_id }),
            )
            .await
    }
}
