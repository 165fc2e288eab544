//! Request routing
//!
//! The dispatcher turns an [`OperationRequest`] into exactly one [`Reply`].
//! Every path ends in a reply: unknown tools, bad arguments, remote failures
//! and handler panics all come back as error envelopes.

use std::any::Any;
use std::sync::Arc;

use attio_client::RemoteService;
use serde_json::{json, Value};

use crate::envelope::Envelope;
use crate::error::{McpError, McpResult};
use crate::resources::{self, ResourceContent, ResourceEntry};
use crate::tools::args::{into_arguments, Arguments};
use crate::tools::{OperationTable, ToolDefinition, ToolKind};

/// Inbound operation, independent of the wire protocol
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    ResourceList,
    ResourceRead { uri: String },
    ToolList,
    ToolCall { name: String, arguments: Value },
}

impl OperationRequest {
    /// Map a protocol method and its params to an operation.
    ///
    /// Returns `None` for methods that are not operations.
    pub fn from_method(method: &str, params: &Value) -> Option<Self> {
        let text = |key: &str| {
            params
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        match method {
            "resources/list" => Some(OperationRequest::ResourceList),
            "resources/read" => Some(OperationRequest::ResourceRead { uri: text("uri") }),
            "tools/list" => Some(OperationRequest::ToolList),
            "tools/call" => Some(OperationRequest::ToolCall {
                name: text("name"),
                arguments: params.get("arguments").cloned().unwrap_or(Value::Null),
            }),
            _ => None,
        }
    }
}

/// Result of one dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Resources(Vec<ResourceEntry>),
    Contents(Vec<ResourceContent>),
    Tools(Vec<ToolDefinition>),
    Envelope(Envelope),
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Envelope(envelope) if envelope.is_error)
    }

    /// Protocol result payload
    pub fn into_value(self) -> McpResult<Value> {
        Ok(match self {
            Reply::Resources(resources) => json!({ "resources": resources }),
            Reply::Contents(contents) => json!({ "contents": contents }),
            Reply::Tools(tools) => json!({ "tools": tools }),
            Reply::Envelope(envelope) => serde_json::to_value(envelope)?,
        })
    }
}

/// Routes operations to resources and tool handlers
pub struct Dispatcher {
    table: OperationTable,
    client: Arc<dyn RemoteService>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn RemoteService>) -> McpResult<Self> {
        Ok(Self {
            table: OperationTable::new()?,
            client,
        })
    }

    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    pub async fn dispatch(&self, request: OperationRequest) -> Reply {
        match request {
            OperationRequest::ResourceList => self.list_resources().await,
            OperationRequest::ResourceRead { uri } => self.read_resource(&uri).await,
            OperationRequest::ToolList => Reply::Tools(self.table.definitions()),
            OperationRequest::ToolCall { name, arguments } => {
                Reply::Envelope(self.call_tool(&name, arguments).await)
            }
        }
    }

    pub async fn list_resources(&self) -> Reply {
        match resources::list_recent_companies(self.client.as_ref()).await {
            Ok(entries) => Reply::Resources(entries),
            Err(err) => Reply::Envelope(failed("resources/list", &err)),
        }
    }

    pub async fn read_resource(&self, uri: &str) -> Reply {
        match resources::read_resource(self.client.as_ref(), uri).await {
            Ok(contents) => Reply::Contents(contents),
            Err(err) => Reply::Envelope(failed("resources/read", &err)),
        }
    }

    /// Look up, validate and run one tool.
    ///
    /// The handler runs on its own task so that a panic inside it is caught
    /// here and reported as an envelope naming the tool.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Envelope {
        let Some(entry) = self.table.get(name) else {
            tracing::warn!(tool = %name, "Unknown tool requested");
            return Envelope::from_error(&McpError::UnknownTool(name.to_string()));
        };

        let arguments = match into_arguments(arguments).and_then(|args| entry.validator.validate(args)) {
            Ok(arguments) => arguments,
            Err(err) => {
                tracing::debug!(tool = %name, error = %err, "Rejected tool arguments");
                return Envelope::from_error(&err);
            }
        };

        tracing::debug!(tool = %name, "Calling tool");
        match self.run(entry.kind, arguments).await {
            Ok(Ok(text)) => Envelope::success(text),
            Ok(Err(err)) => failed(name, &err),
            Err(message) => {
                tracing::error!(tool = %name, fault = %message, "Tool handler faulted");
                Envelope::unhandled_fault(name, &message)
            }
        }
    }

    async fn run(
        &self,
        kind: ToolKind,
        arguments: Arguments,
    ) -> Result<McpResult<String>, String> {
        let client = Arc::clone(&self.client);
        let task = tokio::spawn(async move { kind.invoke(client.as_ref(), arguments).await });

        task.await.map_err(|e| {
            if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            }
        })
    }
}

fn failed(operation: &str, err: &McpError) -> Envelope {
    if let McpError::Remote(failure) = err {
        tracing::warn!(
            operation = %operation,
            method = %failure.method,
            url = %failure.url,
            status = ?failure.status,
            "Remote call failed"
        );
    } else {
        tracing::debug!(operation = %operation, error = %err, "Operation failed");
    }
    Envelope::from_error(err)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
