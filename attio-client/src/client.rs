//! Attio client for communicating with the Attio REST API

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, RemoteFailure, RemoteResult};

/// HTTP methods used against the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote service interface
///
/// One GET and one POST primitive. Both resolve `path` against a fixed base
/// URL and return the parsed JSON body on 2xx; anything else becomes a
/// [`RemoteFailure`].
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Issue a GET request
    async fn get(&self, path: &str) -> RemoteResult<Value>;

    /// Issue a POST request with a JSON body
    async fn post(&self, path: &str, body: Value) -> RemoteResult<Value>;
}

/// reqwest-backed Attio client
///
/// The bearer credential is installed as a default header when the client is
/// built. Retries, timeouts and pooling are left at the reqwest defaults.
pub struct AttioClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AttioClient {
    /// Build a client bound to `config`
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|e| ClientError::InvalidCredential(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>) -> RemoteResult<Value> {
        let url = self.config.url_for(path);
        tracing::debug!(method = %method, url = %url, "Sending Attio request");

        let mut request = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Attio request failed before a response");
            RemoteFailure::transport(method, url.as_str(), e.to_string())
        })?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteFailure::transport(method, url.as_str(), e.to_string()))?;
        let data = parse_body(&bytes);

        if status.is_success() {
            Ok(data)
        } else {
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                "Attio request rejected"
            );
            Err(RemoteFailure::from_status(method, url, status.as_u16(), headers, data))
        }
    }
}

#[async_trait]
impl RemoteService for AttioClient {
    async fn get(&self, path: &str) -> RemoteResult<Value> {
        self.send(HttpMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> RemoteResult<Value> {
        self.send(HttpMethod::Post, path, Some(body)).await
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let text = value
                .to_str()
                .map(str::to_string)
                .unwrap_or_else(|_| String::from_utf8_lossy(value.as_bytes()).into_owned());
            (name.as_str().to_string(), text)
        })
        .collect()
}

/// Parse a response body: JSON when possible, a string otherwise, null when empty
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
