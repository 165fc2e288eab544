//! MCP Tool implementations
//!
//! These are the tools exposed to agents through the MCP protocol. Each tool
//! name maps to one [`ToolKind`] variant; the [`OperationTable`] is built once
//! at startup and only read afterwards.

pub mod args;
pub mod companies;
pub mod deals;
pub mod members;
pub mod notes;

use std::collections::HashMap;

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::McpResult;
use args::{ArgumentValidator, Arguments};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Every operation the server can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SearchCompanies,
    ReadCompanyDetails,
    ReadCompanyNotes,
    CreateCompanyNote,
    FilterCompanies,
    ReadDealDetails,
    CreateDealNote,
    ListWorkspaceMembers,
    GetWorkspaceMember,
}

impl ToolKind {
    /// All tools in listing order
    pub const ALL: [ToolKind; 9] = [
        ToolKind::SearchCompanies,
        ToolKind::ReadCompanyDetails,
        ToolKind::ReadCompanyNotes,
        ToolKind::CreateCompanyNote,
        ToolKind::FilterCompanies,
        ToolKind::ReadDealDetails,
        ToolKind::CreateDealNote,
        ToolKind::ListWorkspaceMembers,
        ToolKind::GetWorkspaceMember,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchCompanies => "search-companies",
            ToolKind::ReadCompanyDetails => "read-company-details",
            ToolKind::ReadCompanyNotes => "read-company-notes",
            ToolKind::CreateCompanyNote => "create-company-note",
            ToolKind::FilterCompanies => "filter-companies",
            ToolKind::ReadDealDetails => "read-deal-details",
            ToolKind::CreateDealNote => "create-deal-note",
            ToolKind::ListWorkspaceMembers => "list-workspace-members",
            ToolKind::GetWorkspaceMember => "get-workspace-member",
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            ToolKind::SearchCompanies => companies::search_companies_tool(),
            ToolKind::ReadCompanyDetails => companies::read_company_details_tool(),
            ToolKind::ReadCompanyNotes => notes::read_company_notes_tool(),
            ToolKind::CreateCompanyNote => notes::create_company_note_tool(),
            ToolKind::FilterCompanies => companies::filter_companies_tool(),
            ToolKind::ReadDealDetails => deals::read_deal_details_tool(),
            ToolKind::CreateDealNote => notes::create_deal_note_tool(),
            ToolKind::ListWorkspaceMembers => members::list_workspace_members_tool(),
            ToolKind::GetWorkspaceMember => members::get_workspace_member_tool(),
        }
    }

    /// Run the handler for this tool against validated arguments.
    ///
    /// Returns the success text; every failure comes back as an error for the
    /// caller to turn into an envelope.
    pub async fn invoke(self, client: &dyn RemoteService, args: Arguments) -> McpResult<String> {
        match self {
            ToolKind::SearchCompanies => companies::search_companies(client, args::parse(args)?).await,
            ToolKind::ReadCompanyDetails => companies::read_company_details(client, args::parse(args)?).await,
            ToolKind::ReadCompanyNotes => notes::read_company_notes(client, args::parse(args)?).await,
            ToolKind::CreateCompanyNote => notes::create_company_note(client, args::parse(args)?).await,
            ToolKind::FilterCompanies => companies::filter_companies(client, args::parse(args)?).await,
            ToolKind::ReadDealDetails => deals::read_deal_details(client, args::parse(args)?).await,
            ToolKind::CreateDealNote => notes::create_deal_note(client, args::parse(args)?).await,
            ToolKind::ListWorkspaceMembers => members::list_workspace_members(client).await,
            ToolKind::GetWorkspaceMember => members::get_workspace_member(client, args::parse(args)?).await,
        }
    }
}

/// One row of the operation table
#[derive(Debug)]
pub struct ToolEntry {
    pub kind: ToolKind,
    pub definition: ToolDefinition,
    pub validator: ArgumentValidator,
}

/// Immutable tool-name lookup
#[derive(Debug)]
pub struct OperationTable {
    entries: Vec<ToolEntry>,
    index: HashMap<&'static str, usize>,
}

impl OperationTable {
    /// Build the table, compiling every input schema
    pub fn new() -> McpResult<Self> {
        let mut entries = Vec::with_capacity(ToolKind::ALL.len());
        let mut index = HashMap::with_capacity(ToolKind::ALL.len());

        for kind in ToolKind::ALL {
            let definition = kind.definition();
            let validator = ArgumentValidator::compile(&definition.input_schema)?;
            index.insert(kind.name(), entries.len());
            entries.push(ToolEntry {
                kind,
                definition,
                validator,
            });
        }

        Ok(Self { entries, index })
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).and_then(|&i| self.entries.get(i))
    }

    /// Definitions in listing order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
