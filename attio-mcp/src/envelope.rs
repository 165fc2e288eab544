//! Uniform result envelope
//!
//! Every tool call produces exactly one [`Envelope`]. Failures still carry a
//! text block; for remote failures that block alone is enough to diagnose
//! the problem (message, method, URL, status, headers, body).

use std::collections::BTreeMap;

use attio_client::{HttpMethod, RemoteFailure};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::McpError;

/// Sentinel used when the remote gave no error payload
pub const UNKNOWN_ERROR_DETAILS: &str = "Unknown error occurred";

/// Tool call response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub content: Vec<ContentBlock>,

    #[serde(rename = "isError")]
    pub is_error: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Structured error attached to a failed envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: i64,
    pub message: String,
    pub details: Value,
}

impl Envelope {
    /// Successful result with one text block
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
            error: None,
        }
    }

    /// Full diagnostic envelope for a failed remote call
    pub fn remote_error(failure: &RemoteFailure) -> Self {
        let text = diagnostic_text(
            &failure.message,
            failure.method,
            &failure.url,
            failure.status,
            &failure.headers,
            &failure.data,
        );

        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
            error: Some(EnvelopeError {
                code: i64::from(failure.status.unwrap_or(500)),
                message: failure.message.clone(),
                details: error_details(&failure.data),
            }),
        }
    }

    /// Envelope for any recoverable server error
    pub fn from_error(err: &McpError) -> Self {
        match err {
            McpError::Remote(failure) => Self::remote_error(failure),
            McpError::Fault { .. } => Self::failure(err.error_code(), err.to_string(), err.to_string()),
            other => Self::failure(
                other.error_code(),
                other.to_string(),
                format!("ERROR: {}", other),
            ),
        }
    }

    /// Minimal envelope for a fault caught at the dispatch boundary
    pub fn unhandled_fault(tool: &str, message: &str) -> Self {
        Self::from_error(&McpError::Fault {
            tool: tool.to_string(),
            message: message.to_string(),
        })
    }

    fn failure(code: i64, message: String, text: String) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
            error: Some(EnvelopeError {
                code,
                details: Value::String(message.clone()),
                message,
            }),
        }
    }

    /// All text blocks joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render the remote failure diagnostic block.
///
/// Field order is fixed: message, method, URL, status, headers, data.
pub fn diagnostic_text(
    message: &str,
    method: HttpMethod,
    url: &str,
    status: Option<u16>,
    headers: &BTreeMap<String, String>,
    data: &Value,
) -> String {
    let status = status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unavailable".to_string());
    let empty = json!({});
    let data = if data.is_null() { &empty } else { data };

    format!(
        "ERROR: {message}\n\n\
         === Request Details ===\n\
         - Method: {method}\n\
         - URL: {url}\n\n\
         === Response Details ===\n\
         - Status: {status}\n\
         - Headers: {headers}\n\
         - Data: {data}\n",
        headers = pretty(&json!(headers)),
        data = pretty(data),
    )
}

fn error_details(data: &Value) -> Value {
    match data.get("error") {
        Some(inner) if !inner.is_null() => inner.clone(),
        _ if !data.is_null() => data.clone(),
        _ => Value::String(UNKNOWN_ERROR_DETAILS.to_string()),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_400() -> RemoteFailure {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        RemoteFailure::from_status(
            HttpMethod::Post,
            "https://api.attio.com/v2/notes",
            400,
            headers,
            json!({"message": "parent_record_id is invalid"}),
        )
    }

    #[test]
    fn test_success_shape() {
        let envelope = Envelope::success("hello");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value, json!({"content": [{"type": "text", "text": "hello"}], "isError": false}));
    }

    #[test]
    fn test_remote_error_fields_in_order() {
        let envelope = Envelope::remote_error(&failure_400());
        let text = envelope.text();

        let positions: Vec<usize> = [
            "ERROR: Request failed with status code 400",
            "- Method: POST",
            "- URL: https://api.attio.com/v2/notes",
            "- Status: 400",
            "- Headers:",
            "- Data:",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("parent_record_id is invalid"));
        assert!(envelope.is_error);
    }

    #[test]
    fn test_remote_error_structured_fields() {
        let envelope = Envelope::remote_error(&failure_400());
        let error = envelope.error.unwrap();

        assert_eq!(error.code, 400);
        assert_eq!(error.message, "Request failed with status code 400");
        assert_eq!(error.details, json!({"message": "parent_record_id is invalid"}));
    }

    #[test]
    fn test_error_member_preferred_for_details() {
        let failure = RemoteFailure::from_status(
            HttpMethod::Get,
            "https://api.attio.com/v2/x",
            422,
            BTreeMap::new(),
            json!({"error": {"reason": "bad filter"}}),
        );
        let error = Envelope::remote_error(&failure).error.unwrap();
        assert_eq!(error.details, json!({"reason": "bad filter"}));
    }

    #[test]
    fn test_transport_failure_defaults() {
        let failure = RemoteFailure::transport(HttpMethod::Get, "https://api.attio.com/v2/x", "dns error");
        let envelope = Envelope::remote_error(&failure);
        let error = envelope.error.clone().unwrap();

        assert_eq!(error.code, 500);
        assert_eq!(error.details, json!(UNKNOWN_ERROR_DETAILS));
        assert!(envelope.text().contains("- Status: unavailable"));
        assert!(envelope.text().contains("- Headers: {}"));
        assert!(envelope.text().contains("- Data: {}"));
    }

    #[test]
    fn test_unhandled_fault_names_tool() {
        let envelope = Envelope::unhandled_fault("search-companies", "boom");

        assert!(envelope.is_error);
        assert_eq!(envelope.text(), "Error executing tool 'search-companies': boom");
        assert_eq!(envelope.error.unwrap().code, -32603);
    }

    #[test]
    fn test_local_error_text() {
        let envelope = Envelope::from_error(&McpError::UnknownTool("launch-rockets".into()));

        assert!(envelope.is_error);
        assert_eq!(envelope.text(), "ERROR: Unknown tool: launch-rockets");
        assert_eq!(envelope.error.unwrap().code, -32601);
    }
}
