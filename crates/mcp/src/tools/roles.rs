// Role management tools: CRUD and membership.

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_array, json_schema_number, json_schema_object, json_schema_string, respond, Tool,
};
use anyhow::{Context, Result};
use hap_api::HapClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Application role listing.
pub struct ListRolesTool {
    client: Arc<HapClient>,
}

impl ListRolesTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListRolesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_roles".to_string(),
            description: "Get list of roles in the application".to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        respond(self.client.roles().list().await)
    }
}

/// Single role detail.
pub struct GetRoleDetailTool {
    client: Arc<HapClient>,
}

impl GetRoleDetailTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleIdArgs {
    role_id: String,
}

#[async_trait::async_trait]
impl Tool for GetRoleDetailTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_role_detail".to_string(),
            description: "Get detailed information about a specific role".to_string(),
            input_schema: json_schema_object(
                json!({ "roleId": json_schema_string("Role ID") }),
                vec!["roleId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RoleIdArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_role_detail")?;
        respond(self.client.roles().detail(&args.role_id).await)
    }
}

/// Role creation.
pub struct CreateRoleTool {
    client: Arc<HapClient>,
}

impl CreateRoleTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoleArgs {
    name: String,
    description: Option<String>,
    permission_way: Option<i64>,
    #[serde(default)]
    sheets: Vec<Value>,
}

#[async_trait::async_trait]
impl Tool for CreateRoleTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_role".to_string(),
            description: "Create a new role in the application".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Role name"),
                    "description": json_schema_string("Role description"),
                    "permissionWay": json_schema_number("Permission method"),
                    "sheets": json_schema_array(
                        json!({"type": "object"}),
                        "Worksheet permissions: {worksheetId, operate} entries",
                    ),
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CreateRoleArgs =
            serde_json::from_value(arguments).context("Invalid arguments for create_role")?;
        let mut payload = json!({ "name": args.name });
        if let Some(description) = args.description {
            payload["description"] = json!(description);
        }
        if let Some(permission_way) = args.permission_way {
            payload["permissionWay"] = json!(permission_way);
        }
        if !args.sheets.is_empty() {
            payload["sheets"] = json!(args.sheets);
        }
        respond(self.client.roles().create(payload).await)
    }
}

/// Role deletion.
pub struct DeleteRoleTool {
    client: Arc<HapClient>,
}

impl DeleteRoleTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteRoleTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_role".to_string(),
            description: "Delete a role from the application".to_string(),
            input_schema: json_schema_object(
                json!({ "roleId": json_schema_string("Role ID to delete") }),
                vec!["roleId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RoleIdArgs =
            serde_json::from_value(arguments).context("Invalid arguments for delete_role")?;
        respond(self.client.roles().delete(&args.role_id).await)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleMembersArgs {
    role_id: String,
    user_ids: Vec<String>,
}

/// Membership addition.
pub struct AddRoleMembersTool {
    client: Arc<HapClient>,
}

impl AddRoleMembersTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AddRoleMembersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_role_members".to_string(),
            description: "Add members to a role".to_string(),
            input_schema: json_schema_object(
                json!({
                    "roleId": json_schema_string("Role ID"),
                    "userIds": json_schema_array(
                        json!({"type": "string"}),
                        "Array of user IDs to add to the role",
                    ),
                }),
                vec!["roleId", "userIds"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RoleMembersArgs =
            serde_json::from_value(arguments).context("Invalid arguments for add_role_members")?;
        respond(
            self.client
                .roles()
                .add_members(&args.role_id, &args.user_ids)
                .await,
        )
    }
}

/// Membership removal.
pub struct RemoveRoleMembersTool {
    client: Arc<HapClient>,
}

impl RemoveRoleMembersTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for RemoveRoleMembersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "remove_role_members".to_string(),
            description: "Remove members from a role".to_string(),
            input_schema: json_schema_object(
                json!({
                    "roleId": json_schema_string("Role ID"),
                    "userIds": json_schema_array(
                        json!({"type": "string"}),
                        "Array of user IDs to remove from the role",
                    ),
                }),
                vec!["roleId", "userIds"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RoleMembersArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for remove_role_members")?;
        respond(
            self.client
                .roles()
                .remove_members(&args.role_id, &args.user_ids)
                .await,
        )
    }
}

/// Leave the application.
pub struct ExitAppTool {
    client: Arc<HapClient>,
}

impl ExitAppTool {
    pub fn new(client: Arc<HapClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ExitAppTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "exit_app".to_string(),
            description: "Exit from the application".to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        respond(self.client.roles().quit().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_args_require_both_fields() {
        let ok: Result<RoleMembersArgs, _> =
            serde_json::from_value(json!({"roleId": "r1", "userIds": ["u1", "u2"]}));
        assert!(ok.is_ok());
        let missing: Result<RoleMembersArgs, _> = serde_json::from_value(json!({"roleId": "r1"}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_create_role_optional_fields() {
        let args: CreateRoleArgs = serde_json::from_value(json!({"name": "Viewer"})).unwrap();
        assert!(args.description.is_none());
        assert!(args.sheets.is_empty());
    }
}
