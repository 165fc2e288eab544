//! Configuration for the Attio client

use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the Attio API key
pub const API_KEY_ENV: &str = "ATTIO_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "ATTIO_BASE_URL";

/// Public Attio REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.attio.com/v2";

/// Immutable client configuration.
///
/// Built once at startup and shared by every operation handler through the
/// client it configures. There is no per-call override of either field.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to, without trailing slash
    pub base_url: String,

    /// Bearer credential
    api_key: String,
}

impl ClientConfig {
    /// Create a configuration from explicit values
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::MissingCredential(API_KEY_ENV.to_string()));
        }

        Ok(Self { base_url, api_key })
    }

    /// Build from the process environment
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// `ATTIO_API_KEY` must be present and non-empty. `ATTIO_BASE_URL` falls
    /// back to [`DEFAULT_BASE_URL`].
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::MissingCredential(API_KEY_ENV.to_string()))?;

        let base_url = lookup(BASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::new(base_url, api_key)
    }

    /// Replace the base URL, keeping the credential
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> ClientResult<Self> {
        self.base_url = normalize_base_url(base_url.into())?;
        Ok(self)
    }

    /// The bearer credential
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Resolve a request path against the base URL
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn normalize_base_url(raw: String) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::InvalidBaseUrl(raw));
    }
    Ok(trimmed.to_string())
}
