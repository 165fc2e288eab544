//! Attio MCP Server Library
//!
//! This crate implements a Model Context Protocol (MCP) server that exposes
//! a fixed set of Attio CRM operations to agents.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  JSON-RPC over stdio
//!        ▼
//! ┌──────────────────────┐
//! │      MCP Server      │ ◄── This crate
//! │                      │
//! │  ┌────────────────┐  │
//! │  │   Dispatcher   │  │ - resources/list, resources/read
//! │  │                │  │ - tools/list, tools/call
//! │  └───────┬────────┘  │
//! │          │           │
//! │  ┌───────▼────────┐  │
//! │  │ Operation table│  │ - search-companies, read-company-details
//! │  │  (ToolKind)    │  │ - read-company-notes, create-company-note
//! │  │                │  │ - filter-companies, read-deal-details
//! │  │                │  │ - create-deal-note, list-workspace-members
//! │  │                │  │ - get-workspace-member
//! │  └───────┬────────┘  │
//! │          │           │
//! │  ┌───────▼────────┐  │
//! │  │    Envelope    │  │ - uniform success / error result
//! │  └────────────────┘  │
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │    attio-client      │ ──HTTPS──▶ api.attio.com
//! └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attio_mcp::{Lifecycle, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), attio_mcp::McpError> {
//!     Lifecycle::new()
//!         .check_credentials(|key| std::env::var(key).ok())?
//!         .connect(StdioTransport::connect)?
//!         .serve()
//!         .await
//! }
//! ```

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod resources;
pub mod server;
pub mod tools;

pub use dispatch::{Dispatcher, OperationRequest, Reply};
pub use envelope::{ContentBlock, Envelope, EnvelopeError};
pub use error::{McpError, McpResult};
pub use lifecycle::{Lifecycle, Phase, StdioTransport, Transport};
pub use resources::{Collection, ResourceRef};
pub use server::McpServer;
pub use tools::{OperationTable, ToolDefinition, ToolKind};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "attio-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: &str = "2024-11-05";
