//! MCP Server protocol implementation
//!
//! This module handles the MCP JSON-RPC protocol over newline-delimited
//! streams (stdin/stdout in production).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::dispatch::{Dispatcher, OperationRequest};
use crate::error::{McpError, McpResult};
use crate::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

/// MCP JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct MCPRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize, Deserialize)]
pub struct MCPResponse {
    pub jsonrpc: String,
    /// Serialized as `null` when the request id could not be determined
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MCPError {
    pub code: i64,
    pub message: String,
}

impl MCPResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(MCPError { code, message }),
        }
    }
}

/// Attio MCP server
///
/// Cheap to clone; every clone shares one dispatcher.
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve requests until `reader` reaches end of input.
    ///
    /// Each request runs on its own task; responses go through a single
    /// writer so that every response is written as one whole line. A bad
    /// line is answered with an error and never ends the loop; in-flight
    /// responses are drained on every exit path.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<MCPResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut buf = Vec::new();
        let read_result = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break Ok(()),
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read from input");
                    break Err(McpError::Io(e));
                }
            }

            let request = match parse_line(&buf) {
                Some(Ok(request)) => request,
                Some(Err(rejection)) => {
                    let _ = tx.send(rejection);
                    continue;
                }
                None => continue,
            };

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    let _ = tx.send(response);
                }
            });
        };

        tracing::info!("Input closed, draining in-flight requests");
        drop(tx);
        let written = writer_task
            .await
            .map_err(|e| McpError::Internal(format!("writer task failed: {}", e)))?;

        read_result.and(written)
    }

    /// Handle an MCP request.
    ///
    /// Notifications (no `id`, or a `notifications/` method) produce no
    /// response.
    pub async fn handle_request(&self, request: MCPRequest) -> Option<MCPResponse> {
        if request.method.starts_with("notifications/") {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => MCPResponse::success(request.id.clone(), self.handle_initialize()),
            "ping" => MCPResponse::success(request.id.clone(), json!({})),
            method => match OperationRequest::from_method(method, &request.params) {
                Some(operation) => {
                    let reply = self.dispatcher.dispatch(operation).await;
                    match reply.into_value() {
                        Ok(result) => MCPResponse::success(request.id.clone(), result),
                        Err(e) => MCPResponse::failure(request.id.clone(), e.error_code(), e.to_string()),
                    }
                }
                None => MCPResponse::failure(
                    request.id.clone(),
                    -32601,
                    format!("Method not found: {}", request.method),
                ),
            },
        };

        // A request without an id is a notification: processed, never answered
        if request.id.is_none() {
            return None;
        }
        Some(response)
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {},
                "resources": {}
            }
        })
    }
}

/// Decode one input line.
///
/// `None` for blank lines, `Some(Err(_))` with the error response for lines
/// that are not a JSON-RPC request. Invalid UTF-8 is replaced, not rejected.
fn parse_line(line: &[u8]) -> Option<Result<MCPRequest, MCPResponse>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unparsable request");
            return Some(Err(MCPResponse::failure(None, -32700, format!("Parse error: {}", e))));
        }
    };

    let id = value.get("id").cloned().filter(|id| !id.is_null());
    Some(serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "Discarding malformed request");
        MCPResponse::failure(id, -32600, format!("Invalid Request: {}", e))
    }))
}

async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<MCPResponse>, mut writer: W) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
