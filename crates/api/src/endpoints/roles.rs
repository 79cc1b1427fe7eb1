//! Role management endpoints.

use crate::client::HapClient;
use crate::error::HapResult;
use serde_json::{json, Value};

/// Application role CRUD and membership.
pub struct RolesApi<'a> {
    client: &'a HapClient,
}

impl<'a> RolesApi<'a> {
    pub(crate) fn new(client: &'a HapClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> HapResult<Value> {
        self.client.http.post("/v2/open/role/list", json!({})).await
    }

    pub async fn detail(&self, role_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/role/get", json!({ "roleId": role_id }))
            .await
    }

    pub async fn create(&self, payload: Value) -> HapResult<Value> {
        self.client.http.post("/v2/open/role/add", payload).await
    }

    pub async fn delete(&self, role_id: &str) -> HapResult<Value> {
        self.client
            .http
            .post("/v2/open/role/delete", json!({ "roleId": role_id }))
            .await
    }

    pub async fn add_members(&self, role_id: &str, user_ids: &[String]) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/role/addMembers",
                json!({ "roleId": role_id, "userIds": user_ids }),
            )
            .await
    }

    pub async fn remove_members(&self, role_id: &str, user_ids: &[String]) -> HapResult<Value> {
        self.client
            .http
            .post(
                "/v2/open/role/removeMembers",
                json!({ "roleId": role_id, "userIds": user_ids }),
            )
            .await
    }

    /// Leave the application.
    pub async fn quit(&self) -> HapResult<Value> {
        self.client.http.post("/v2/open/role/quit", json!({})).await
    }
}
