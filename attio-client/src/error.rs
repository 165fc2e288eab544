//! Error types for the Attio client

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::client::HttpMethod;

/// Result type for client construction and configuration
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for a single remote call
pub type RemoteResult<T> = Result<T, RemoteFailure>;

/// Errors raised while configuring or building the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Required credential is not present in the environment
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    /// Credential cannot be used as an HTTP header value
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Base URL is not usable
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A failed remote call.
///
/// Carries everything needed to diagnose the failure from a single record:
/// the request that was made and whatever the remote service answered.
/// `status` is `None` when no response was received at all.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RemoteFailure {
    /// HTTP method of the failed request
    pub method: HttpMethod,

    /// Fully resolved request URL
    pub url: String,

    /// Human readable failure message
    pub message: String,

    /// Response status code, if a response arrived
    pub status: Option<u16>,

    /// Response headers, lowercased names
    pub headers: BTreeMap<String, String>,

    /// Response body; parsed JSON when possible, raw text otherwise
    pub data: Value,
}

impl RemoteFailure {
    /// Failure for a non-2xx response
    pub fn from_status(
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        headers: BTreeMap<String, String>,
        data: Value,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            message: format!("Request failed with status code {}", status),
            status: Some(status),
            headers,
            data,
        }
    }

    /// Failure where no usable response was received
    pub fn transport(method: HttpMethod, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            message: message.into(),
            status: None,
            headers: BTreeMap::new(),
            data: Value::Null,
        }
    }

    /// Whether the remote service answered at all
    pub fn has_response(&self) -> bool {
        self.status.is_some()
    }
}
