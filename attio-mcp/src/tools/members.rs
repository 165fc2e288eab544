//! Workspace member tools

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ToolDefinition;
use crate::error::McpResult;
use crate::resources::data_items;

const MEMBERS_PATH: &str = "/workspace_members";

/// list-workspace-members tool definition
pub fn list_workspace_members_tool() -> ToolDefinition {
    ToolDefinition {
        name: "list-workspace-members".to_string(),
        description: "List every member of the Attio workspace.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// get-workspace-member tool definition
pub fn get_workspace_member_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get-workspace-member".to_string(),
        description: "Read a single Attio workspace member.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["memberId"],
            "properties": {
                "memberId": {
                    "type": "string",
                    "description": "Workspace member id"
                }
            }
        }),
    }
}

/// Input for get-workspace-member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    #[serde(rename = "memberId")]
    pub member_id: String,
}

pub async fn list_workspace_members(client: &dyn RemoteService) -> McpResult<String> {
    let response = client.get(MEMBERS_PATH).await?;

    Ok(format!(
        "Found {} workspace members:\n{}",
        data_items(&response).len(),
        serde_json::to_string_pretty(&response)?
    ))
}

pub async fn get_workspace_member(client: &dyn RemoteService, input: MemberInput) -> McpResult<String> {
    let member = client
        .get(&format!("{}/{}", MEMBERS_PATH, input.member_id))
        .await?;

    Ok(format!(
        "Workspace member {}:\n{}",
        input.member_id,
        serde_json::to_string_pretty(&member)?
    ))
}
