//! Attio Client - REST client for the Attio CRM API
//!
//! A thin layer over `reqwest` bound to one base URL and one bearer
//! credential. It knows nothing about companies, deals or notes; callers pass
//! request paths and JSON bodies and get back parsed JSON or a
//! [`RemoteFailure`] describing exactly what went wrong.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attio_client::{AttioClient, ClientConfig, RemoteService};
//!
//! let client = AttioClient::new(ClientConfig::from_env()?)?;
//! let members = client.get("/workspace_members").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{AttioClient, HttpMethod, RemoteService};
pub use config::{ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, RemoteFailure, RemoteResult};
