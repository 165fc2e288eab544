//! Note tools
//!
//! Notes hang off a parent record. Reading is scoped to companies; creating
//! works for companies and deals and goes through one shared request shape.

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::args::default_when_falsy;
use super::ToolDefinition;
use crate::error::McpResult;
use crate::resources::{data_items, Collection, ResourceRef};

pub const DEFAULT_NOTES_LIMIT: u64 = 10;
pub const DEFAULT_NOTES_OFFSET: u64 = 0;

/// Prefix marking notes written through this server
pub const NOTE_TITLE_PREFIX: &str = "[AI] ";

const NOTE_SEPARATOR: &str = "\n----------\n";

/// read-company-notes tool definition
pub fn read_company_notes_tool() -> ToolDefinition {
    ToolDefinition {
        name: "read-company-notes".to_string(),
        description: "Read the notes attached to a company, one page at a time.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["uri"],
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "Company resource URI (attio://companies/{record_id}) or bare record id"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of notes to return (default 10)"
                },
                "offset": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Number of notes to skip (default 0)"
                }
            }
        }),
    }
}

/// create-company-note tool definition
pub fn create_company_note_tool() -> ToolDefinition {
    ToolDefinition {
        name: "create-company-note".to_string(),
        description: "Add a plaintext note to a company in Attio.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["companyId", "title", "content"],
            "properties": {
                "companyId": {
                    "type": "string",
                    "description": "Record id of the company"
                },
                "title": {
                    "type": "string",
                    "description": "Note title"
                },
                "content": {
                    "type": "string",
                    "description": "Note body"
                }
            }
        }),
    }
}

/// create-deal-note tool definition
pub fn create_deal_note_tool() -> ToolDefinition {
    ToolDefinition {
        name: "create-deal-note".to_string(),
        description: "Add a plaintext note to a deal in Attio.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["dealId", "title", "content"],
            "properties": {
                "dealId": {
                    "type": "string",
                    "description": "Record id of the deal"
                },
                "title": {
                    "type": "string",
                    "description": "Note title"
                },
                "content": {
                    "type": "string",
                    "description": "Note body"
                }
            }
        }),
    }
}

/// Input for read-company-notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadCompanyNotesInput {
    pub uri: String,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Input for create-company-note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyNoteInput {
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub title: String,
    pub content: String,
}

/// Input for create-deal-note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDealNoteInput {
    #[serde(rename = "dealId")]
    pub deal_id: String,
    pub title: String,
    pub content: String,
}

pub async fn read_company_notes(client: &dyn RemoteService, input: ReadCompanyNotesInput) -> McpResult<String> {
    let company = ResourceRef::company_from_arg(&input.uri)?;
    let limit = default_when_falsy(input.limit, DEFAULT_NOTES_LIMIT);
    let offset = default_when_falsy(input.offset, DEFAULT_NOTES_OFFSET);

    let response = client
        .get(&format!(
            "/notes?limit={}&offset={}&parent_object={}&parent_record_id={}",
            limit,
            offset,
            Collection::Companies.as_str(),
            company.record_id
        ))
        .await?;

    let notes = data_items(&response);
    let rendered: Vec<String> = notes.iter().map(Value::to_string).collect();

    Ok(format!(
        "Found {} notes for company {}:\n{}",
        notes.len(),
        company.record_id,
        rendered.join(NOTE_SEPARATOR)
    ))
}

pub async fn create_company_note(client: &dyn RemoteService, input: CreateCompanyNoteInput) -> McpResult<String> {
    let note = create_note(
        client,
        Collection::Companies,
        &input.company_id,
        &input.title,
        &input.content,
    )
    .await?;

    Ok(format!("Note added to company {}: {}", input.company_id, note))
}

pub async fn create_deal_note(client: &dyn RemoteService, input: CreateDealNoteInput) -> McpResult<String> {
    let note = create_note(client, Collection::Deals, &input.deal_id, &input.title, &input.content).await?;

    Ok(format!("Note added to deal {}: {}", input.deal_id, note))
}

/// Placeholder reference when the created note's id was not returned
pub const UNKNOWN_NOTE_ID: &str = "(unknown id)";

/// Create a plaintext note under `parent` and return its rendered reference
async fn create_note(
    client: &dyn RemoteService,
    parent: Collection,
    parent_id: &str,
    title: &str,
    content: &str,
) -> McpResult<String> {
    let response = client
        .post(
            "/notes",
            json!({
                "data": {
                    "format": "plaintext",
                    "parent_object": parent.as_str(),
                    "parent_record_id": parent_id,
                    "title": format!("{}{}", NOTE_TITLE_PREFIX, title),
                    "content": content
                }
            }),
        )
        .await?;

    match response
        .pointer("/data/id/note_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    {
        Some(note_id) => Ok(ResourceRef::note(note_id).to_string()),
        None => {
            tracing::warn!(
                parent = parent.as_str(),
                parent_id = %parent_id,
                "Note created but the response carried no note id"
            );
            Ok(UNKNOWN_NOTE_ID.to_string())
        }
    }
}
