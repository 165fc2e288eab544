//! Deal record tools

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ToolDefinition;
use crate::error::McpResult;
use crate::resources::Collection;

/// read-deal-details tool definition
pub fn read_deal_details_tool() -> ToolDefinition {
    ToolDefinition {
        name: "read-deal-details".to_string(),
        description: "Read the full record of a deal in Attio.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["dealId"],
            "properties": {
                "dealId": {
                    "type": "string",
                    "description": "Record id of the deal"
                }
            }
        }),
    }
}

/// Input for read-deal-details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealInput {
    #[serde(rename = "dealId")]
    pub deal_id: String,
}

pub async fn read_deal_details(client: &dyn RemoteService, input: DealInput) -> McpResult<String> {
    let record = client.get(&Collection::Deals.record_path(&input.deal_id)).await?;

    Ok(format!(
        "Deal details for {}:\n{}",
        input.deal_id,
        serde_json::to_string_pretty(&record)?
    ))
}
