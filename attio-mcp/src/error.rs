//! Error types for the Attio MCP server

use attio_client::{ClientError, RemoteFailure};
use thiserror::Error;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// Required credential absent at startup
    #[error("Missing credential: {0} must be set")]
    MissingCredential(String),

    /// Client configuration rejected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport could not be established
    #[error("Transport error: {0}")]
    Transport(String),

    /// Tool name not present in the operation table
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required tool argument missing or null
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Tool arguments failed the input schema
    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),

    /// Resource reference with an unrecognised scheme or collection
    #[error("Invalid resource URI: {0}")]
    InvalidResourceUri(String),

    /// Remote service call failed
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    /// A handler faulted outside its own error path
    #[error("Error executing tool '{tool}': {message}")]
    Fault { tool: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Get error code for MCP protocol.
    ///
    /// Remote failures report the remote status (500 without a response);
    /// everything else uses JSON-RPC codes.
    pub fn error_code(&self) -> i64 {
        match self {
            McpError::Remote(failure) => i64::from(failure.status.unwrap_or(500)),
            McpError::UnknownTool(_) => -32601,
            McpError::MissingArgument(_) => -32602,
            McpError::InvalidArgument(_) => -32602,
            McpError::InvalidResourceUri(_) => -32002,
            McpError::Serialization(_) => -32700,
            _ => -32603,
        }
    }

    /// Whether the error ends the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            McpError::MissingCredential(_) | McpError::Config(_) | McpError::Transport(_)
        )
    }
}

impl From<ClientError> for McpError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::MissingCredential(var) => McpError::MissingCredential(var),
            other => McpError::Config(other.to_string()),
        }
    }
}
