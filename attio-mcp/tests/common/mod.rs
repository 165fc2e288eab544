//! Shared test doubles

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use attio_client::{HttpMethod, RemoteFailure, RemoteResult, RemoteService};
use attio_mcp::Dispatcher;
use serde_json::Value;

pub const BASE_URL: &str = "https://api.attio.com/v2";

/// One recorded remote call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

type Responder = dyn Fn(&Call) -> RemoteResult<Value> + Send + Sync;

/// In-process remote service answering from a closure
pub struct StubService {
    responder: Box<Responder>,
    calls: Mutex<Vec<Call>>,
}

impl StubService {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&Call) -> RemoteResult<Value> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Stub that answers every call with `value`
    pub fn returning(value: Value) -> Arc<Self> {
        Self::new(move |_| Ok(value.clone()))
    }

    /// Stub that rejects every call with `status` and `data`
    pub fn failing(status: u16, data: Value) -> Arc<Self> {
        Self::new(move |call| {
            let mut headers = BTreeMap::new();
            headers.insert("content-type".to_string(), "application/json".to_string());
            Err(RemoteFailure::from_status(
                call.method,
                format!("{}{}", BASE_URL, call.path),
                status,
                headers,
                data.clone(),
            ))
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> RemoteResult<Value> {
        self.calls.lock().unwrap().push(call.clone());
        (self.responder)(&call)
    }
}

#[async_trait]
impl RemoteService for StubService {
    async fn get(&self, path: &str) -> RemoteResult<Value> {
        self.record(Call {
            method: HttpMethod::Get,
            path: path.to_string(),
            body: None,
        })
    }

    async fn post(&self, path: &str, body: Value) -> RemoteResult<Value> {
        self.record(Call {
            method: HttpMethod::Post,
            path: path.to_string(),
            body: Some(body),
        })
    }
}

pub fn dispatcher(stub: &Arc<StubService>) -> Dispatcher {
    Dispatcher::new(stub.clone()).unwrap()
}
