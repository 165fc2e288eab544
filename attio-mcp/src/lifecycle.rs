//! Process lifecycle
//!
//! ```text
//! Uninitialized ──check_credentials──▶ CredentialChecked ──connect──▶ TransportConnected ──serve──▶ Serving
//! ```
//!
//! Each phase is its own type, so the transitions can only happen in order
//! and only once. A failed transition consumes the lifecycle; the caller is
//! expected to exit.

use std::fmt;
use std::sync::Arc;

use attio_client::{AttioClient, ClientConfig, RemoteService};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, Stdin, Stdout};

use crate::dispatch::Dispatcher;
use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Lifecycle phase, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    CredentialChecked,
    TransportConnected,
    Serving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::CredentialChecked => "credential-checked",
            Phase::TransportConnected => "transport-connected",
            Phase::Serving => "serving",
        };
        f.write_str(name)
    }
}

/// A bidirectional line transport
pub trait Transport: Send {
    type Reader: AsyncBufRead + Unpin + Send;
    type Writer: AsyncWrite + Unpin + Send + 'static;

    fn split(self) -> (Self::Reader, Self::Writer);
}

/// stdin/stdout transport
pub struct StdioTransport {
    stdin: BufReader<Stdin>,
    stdout: Stdout,
}

impl StdioTransport {
    pub fn connect() -> McpResult<Self> {
        Ok(Self {
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        })
    }
}

impl Transport for StdioTransport {
    type Reader = BufReader<Stdin>;
    type Writer = Stdout;

    fn split(self) -> (Self::Reader, Self::Writer) {
        (self.stdin, self.stdout)
    }
}

impl<R, W> Transport for (R, W)
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    type Reader = R;
    type Writer = W;

    fn split(self) -> (R, W) {
        self
    }
}

pub trait LifecycleState {
    const PHASE: Phase;
}

pub struct Uninitialized;

pub struct CredentialChecked {
    config: ClientConfig,
}

pub struct TransportConnected<T> {
    server: McpServer,
    transport: T,
}

impl LifecycleState for Uninitialized {
    const PHASE: Phase = Phase::Uninitialized;
}

impl LifecycleState for CredentialChecked {
    const PHASE: Phase = Phase::CredentialChecked;
}

impl<T> LifecycleState for TransportConnected<T> {
    const PHASE: Phase = Phase::TransportConnected;
}

/// Single-shot startup sequence
pub struct Lifecycle<S> {
    state: S,
}

impl<S: LifecycleState> Lifecycle<S> {
    pub fn phase(&self) -> Phase {
        S::PHASE
    }
}

impl Lifecycle<Uninitialized> {
    pub fn new() -> Self {
        Self { state: Uninitialized }
    }

    /// Read the credential through `lookup`; fails if it is absent
    pub fn check_credentials<F>(self, lookup: F) -> McpResult<Lifecycle<CredentialChecked>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ClientConfig::from_lookup(lookup)?;
        tracing::info!(phase = %Phase::CredentialChecked, base_url = %config.base_url, "Credential found");

        Ok(Lifecycle {
            state: CredentialChecked { config },
        })
    }
}

impl Default for Lifecycle<Uninitialized> {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle<CredentialChecked> {
    pub fn config(&self) -> &ClientConfig {
        &self.state.config
    }

    /// Override the base URL taken from the environment
    pub fn with_base_url(self, base_url: Option<String>) -> McpResult<Self> {
        let config = match base_url {
            Some(url) => self.state.config.with_base_url(url)?,
            None => self.state.config,
        };
        Ok(Lifecycle {
            state: CredentialChecked { config },
        })
    }

    /// Build the Attio client and establish the transport
    pub fn connect<T, F>(self, establish: F) -> McpResult<Lifecycle<TransportConnected<T>>>
    where
        T: Transport,
        F: FnOnce() -> McpResult<T>,
    {
        let client = AttioClient::new(self.state.config.clone())?;
        self.connect_with_client(Arc::new(client), establish)
    }

    /// Same as [`connect`](Self::connect) with a caller-supplied remote service
    pub fn connect_with_client<T, F>(
        self,
        client: Arc<dyn RemoteService>,
        establish: F,
    ) -> McpResult<Lifecycle<TransportConnected<T>>>
    where
        T: Transport,
        F: FnOnce() -> McpResult<T>,
    {
        let server = McpServer::new(Dispatcher::new(client)?);
        let transport = establish().map_err(|e| match e {
            McpError::Transport(_) => e,
            other => McpError::Transport(other.to_string()),
        })?;
        tracing::info!(phase = %Phase::TransportConnected, "Transport established");

        Ok(Lifecycle {
            state: TransportConnected { server, transport },
        })
    }
}

impl<T: Transport> Lifecycle<TransportConnected<T>> {
    pub fn server(&self) -> &McpServer {
        &self.state.server
    }

    /// Serve until the transport's input closes
    pub async fn serve(self) -> McpResult<()> {
        let TransportConnected { server, transport } = self.state;
        let (reader, writer) = transport.split();

        tracing::info!(phase = %Phase::Serving, "MCP server ready");
        server.serve(reader, writer).await
    }
}
