//! Company record tools

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::args::default_when_falsy;
use super::ToolDefinition;
use crate::error::McpResult;
use crate::resources::{data_items, display_name, record_id, ResourceRef};

const QUERY_PATH: &str = "/objects/companies/records/query";

/// Default page size of filter-companies
pub const DEFAULT_FILTER_LIMIT: u64 = 100;

/// search-companies tool definition
pub fn search_companies_tool() -> ToolDefinition {
    ToolDefinition {
        name: "search-companies".to_string(),
        description: "Search for companies in Attio by name. Returns matching company names with their resource URIs.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Text the company name should contain"
                }
            }
        }),
    }
}

/// read-company-details tool definition
pub fn read_company_details_tool() -> ToolDefinition {
    ToolDefinition {
        name: "read-company-details".to_string(),
        description: "Read the full record of a company in Attio.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["uri"],
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "Company resource URI (attio://companies/{record_id}) or bare record id"
                }
            }
        }),
    }
}

/// filter-companies tool definition
pub fn filter_companies_tool() -> ToolDefinition {
    ToolDefinition {
        name: "filter-companies".to_string(),
        description: "Query companies with an Attio filter object. The filter is passed to Attio unchanged.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["filter"],
            "properties": {
                "filter": {
                    "type": "object",
                    "description": "Attio record filter, e.g. {\"name\": {\"$contains\": \"Acme\"}}"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of companies to return (default 100)"
                }
            }
        }),
    }
}

/// Input for search-companies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCompaniesInput {
    pub query: String,
}

/// Input for read-company-details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyUriInput {
    pub uri: String,
}

/// Input for filter-companies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCompaniesInput {
    pub filter: Value,
    #[serde(default)]
    pub limit: Option<u64>,
}

pub async fn search_companies(client: &dyn RemoteService, input: SearchCompaniesInput) -> McpResult<String> {
    let response = client
        .post(
            QUERY_PATH,
            json!({
                "filter": {
                    "name": { "$contains": input.query }
                }
            }),
        )
        .await?;

    let companies = data_items(&response);
    let lines: Vec<String> = companies
        .iter()
        .map(|company| {
            format!(
                "{}: {}",
                display_name(company, "Unknown"),
                ResourceRef::company(record_id(company))
            )
        })
        .collect();

    Ok(format!("Found {} companies:\n{}", companies.len(), lines.join("\n")))
}

pub async fn read_company_details(client: &dyn RemoteService, input: CompanyUriInput) -> McpResult<String> {
    let company = ResourceRef::company_from_arg(&input.uri)?;
    let record = client.get(&company.api_path()).await?;

    Ok(format!(
        "Company details for {}:\n{}",
        company.record_id,
        serde_json::to_string_pretty(&record)?
    ))
}

pub async fn filter_companies(client: &dyn RemoteService, input: FilterCompaniesInput) -> McpResult<String> {
    let limit = default_when_falsy(input.limit, DEFAULT_FILTER_LIMIT);
    let response = client
        .post(
            QUERY_PATH,
            json!({
                "filter": input.filter,
                "limit": limit
            }),
        )
        .await?;

    Ok(format!(
        "Found {} companies matching filter:\n{}",
        data_items(&response).len(),
        serde_json::to_string_pretty(&response)?
    ))
}
