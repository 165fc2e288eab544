//! MCP Resource implementations
//!
//! Resources are Attio records addressed as `attio://<collection>/<record-id>`.
//! Only company records can be listed and read through the resource
//! protocol; the other collections appear in tool output.

use std::fmt;

use attio_client::RemoteService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{McpError, McpResult};

/// URI scheme of every resource reference
pub const URI_SCHEME: &str = "attio";

/// Page size for the recent-companies listing
pub const RECENT_COMPANIES_LIMIT: u64 = 20;

const JSON_MIME_TYPE: &str = "application/json";

/// Record collection named by a resource reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Companies,
    Deals,
    Notes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Companies => "companies",
            Collection::Deals => "deals",
            Collection::Notes => "notes",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "companies" => Some(Collection::Companies),
            "deals" => Some(Collection::Deals),
            "notes" => Some(Collection::Notes),
            _ => None,
        }
    }

    /// API path of a single record in this collection
    pub fn record_path(&self, record_id: &str) -> String {
        match self {
            Collection::Notes => format!("/notes/{}", record_id),
            object => format!("/objects/{}/records/{}", object.as_str(), record_id),
        }
    }
}

/// Parsed `attio://collection/record-id` reference
///
/// The record id is kept verbatim and is not escaped when it is placed into
/// an API path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub collection: Collection,
    pub record_id: String,
}

impl ResourceRef {
    pub fn new(collection: Collection, record_id: impl Into<String>) -> Self {
        Self {
            collection,
            record_id: record_id.into(),
        }
    }

    pub fn company(record_id: impl Into<String>) -> Self {
        Self::new(Collection::Companies, record_id)
    }

    pub fn note(record_id: impl Into<String>) -> Self {
        Self::new(Collection::Notes, record_id)
    }

    /// Parse a full resource URI
    pub fn parse(uri: &str) -> McpResult<Self> {
        let invalid = || McpError::InvalidResourceUri(uri.to_string());

        let rest = uri
            .strip_prefix(URI_SCHEME)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(invalid)?;
        let (segment, record_id) = rest.split_once('/').ok_or_else(invalid)?;
        let collection = Collection::from_segment(segment).ok_or_else(invalid)?;

        if record_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(collection, record_id))
    }

    /// Parse a company reference given either as a URI or as a bare record id
    pub fn company_from_arg(value: &str) -> McpResult<Self> {
        if value.contains("://") {
            let parsed = Self::parse(value)?;
            if parsed.collection != Collection::Companies {
                return Err(McpError::InvalidResourceUri(value.to_string()));
            }
            Ok(parsed)
        } else if value.is_empty() {
            Err(McpError::InvalidResourceUri(value.to_string()))
        } else {
            Ok(Self::company(value))
        }
    }

    pub fn uri(&self) -> String {
        format!("{}://{}/{}", URI_SCHEME, self.collection.as_str(), self.record_id)
    }

    pub fn api_path(&self) -> String {
        self.collection.record_path(&self.record_id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Entry returned by resources/list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub uri: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Content returned by resources/read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

/// Record id of an Attio record payload
pub fn record_id(record: &Value) -> &str {
    record
        .pointer("/id/record_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Display name of an Attio record payload
pub fn display_name<'a>(record: &'a Value, fallback: &'a str) -> &'a str {
    record
        .pointer("/values/name/0/value")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}

/// Records in a `{"data": [...]}` response
pub fn data_items(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Companies with the most recent interaction, newest first
pub async fn list_recent_companies(client: &dyn RemoteService) -> McpResult<Vec<ResourceEntry>> {
    let response = client
        .post(
            "/objects/companies/records/query",
            json!({
                "limit": RECENT_COMPANIES_LIMIT,
                "sorts": [{
                    "attribute": "last_interaction",
                    "field": "interacted_at",
                    "direction": "desc"
                }]
            }),
        )
        .await?;

    Ok(data_items(&response)
        .iter()
        .map(|company| ResourceEntry {
            uri: ResourceRef::company(record_id(company)).uri(),
            name: display_name(company, "Unknown Company").to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
        })
        .collect())
}

/// Read one company record by resource URI
pub async fn read_resource(client: &dyn RemoteService, uri: &str) -> McpResult<Vec<ResourceContent>> {
    let reference = ResourceRef::parse(uri)?;
    if reference.collection != Collection::Companies {
        return Err(McpError::InvalidResourceUri(uri.to_string()));
    }

    let record = client.get(&reference.api_path()).await?;

    Ok(vec![ResourceContent {
        uri: uri.to_string(),
        mime_type: JSON_MIME_TYPE.to_string(),
        text: serde_json::to_string_pretty(&record)?,
    }])
}
