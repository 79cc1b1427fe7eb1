// MCP tools, one module per API resource family.

pub mod app;
pub mod option_sets;
pub mod records;
pub mod registry;
pub mod reports;
pub mod roles;
pub mod worksheets;

pub use registry::{
    failure_envelope, json_schema_array, json_schema_boolean, json_schema_number,
    json_schema_object, json_schema_result_type, json_schema_string, respond, success_envelope,
    ResultType, Tool, ToolRegistry,
};

use hap_api::HapClient;
use std::sync::Arc;

/// Register the complete tool surface against one API client.
pub fn register_all(registry: &mut ToolRegistry, client: Arc<HapClient>) {
    registry.register(Arc::new(app::GetAppInfoTool::new(client.clone())));
    registry.register(Arc::new(app::ListWorksheetsTool::new(client.clone())));
    registry.register(Arc::new(app::GetAreaInfoTool::new(client.clone())));

    registry.register(Arc::new(worksheets::GetWorksheetFieldsTool::new(client.clone())));
    registry.register(Arc::new(worksheets::GetWorksheetInfoTool::new(client.clone())));
    registry.register(Arc::new(worksheets::CreateWorksheetTool::new(client.clone())));

    registry.register(Arc::new(records::ListWorksheetRecordsTool::new(client.clone())));
    registry.register(Arc::new(records::GetRecordDetailTool::new(client.clone())));
    registry.register(Arc::new(records::AddRecordTool::new(client.clone())));
    registry.register(Arc::new(records::UpdateRecordTool::new(client.clone())));
    registry.register(Arc::new(records::DeleteRecordTool::new(client.clone())));
    registry.register(Arc::new(records::AddRecordsBatchTool::new(client.clone())));
    registry.register(Arc::new(records::UpdateRecordsBatchTool::new(client.clone())));
    registry.register(Arc::new(records::GetRelatedRecordsTool::new(client.clone())));
    registry.register(Arc::new(records::GetRecordShareLinkTool::new(client.clone())));
    registry.register(Arc::new(records::GetRecordCountTool::new(client.clone())));
    registry.register(Arc::new(records::GetRecordLogsTool::new(client.clone())));

    registry.register(Arc::new(roles::ListRolesTool::new(client.clone())));
    registry.register(Arc::new(roles::GetRoleDetailTool::new(client.clone())));
    registry.register(Arc::new(roles::CreateRoleTool::new(client.clone())));
    registry.register(Arc::new(roles::DeleteRoleTool::new(client.clone())));
    registry.register(Arc::new(roles::AddRoleMembersTool::new(client.clone())));
    registry.register(Arc::new(roles::RemoveRoleMembersTool::new(client.clone())));
    registry.register(Arc::new(roles::ExitAppTool::new(client.clone())));

    registry.register(Arc::new(option_sets::CreateOptionSetTool::new(client.clone())));
    registry.register(Arc::new(option_sets::GetOptionSetTool::new(client.clone())));
    registry.register(Arc::new(option_sets::UpdateOptionSetTool::new(client.clone())));
    registry.register(Arc::new(option_sets::DeleteOptionSetTool::new(client.clone())));

    registry.register(Arc::new(reports::GetPivotDataTool::new(client)));
}
