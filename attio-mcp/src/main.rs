//! Attio MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio)
//! ATTIO_API_KEY=... attio-mcp-server
//!
//! # Against another Attio endpoint
//! ATTIO_API_KEY=... attio-mcp-server --base-url http://localhost:8080/v2
//! ```

use attio_mcp::{Lifecycle, McpResult, StdioTransport, SERVER_VERSION};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "attio_mcp=info,attio_client=info";

#[derive(Parser, Debug)]
#[command(name = "attio-mcp-server")]
#[command(about = "MCP server exposing Attio CRM operations over stdio")]
#[command(version)]
struct Args {
    /// Attio API base URL (defaults to https://api.attio.com/v2)
    #[arg(long, env = "ATTIO_BASE_URL")]
    base_url: Option<String>,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries protocol frames only
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&args.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Attio MCP Server v{}", SERVER_VERSION);

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, fatal = e.is_fatal(), "Attio MCP Server stopped");
        return Err(e.into());
    }

    tracing::info!("Attio MCP Server exiting");
    Ok(())
}

async fn run(args: Args) -> McpResult<()> {
    Lifecycle::new()
        .check_credentials(|key| std::env::var(key).ok())?
        .with_base_url(args.base_url)?
        .connect(StdioTransport::connect)?
        .serve()
        .await
}
