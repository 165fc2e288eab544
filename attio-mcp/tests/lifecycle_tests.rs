//! Startup sequence tests

mod common;

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use attio_mcp::{Lifecycle, McpError, Phase};
use common::StubService;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

const BIN: &str = env!("CARGO_BIN_EXE_attio-mcp-server");

fn with_key(key: &str) -> Option<String> {
    (key == "ATTIO_API_KEY").then(|| "test-key".to_string())
}

#[test]
fn test_missing_credential_stops_before_transport() {
    let attempts = AtomicUsize::new(0);

    let result = Lifecycle::new().check_credentials(|_| None).map(|checked| {
        checked.connect(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok((BufReader::new(tokio::io::empty()), tokio::io::sink()))
        })
    });

    assert!(matches!(result, Err(McpError::MissingCredential(ref v)) if v == "ATTIO_API_KEY"));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[test]
fn test_blank_credential_is_missing() {
    let result = Lifecycle::new().check_credentials(|_| Some("   ".to_string()));
    assert!(matches!(result, Err(McpError::MissingCredential(_))));
}

#[test]
fn test_invalid_base_url_rejected() {
    let result = Lifecycle::new()
        .check_credentials(with_key)
        .unwrap()
        .with_base_url(Some("ftp://example.com".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_transport_failure_reported() {
    let result = Lifecycle::new()
        .check_credentials(with_key)
        .unwrap()
        .connect_with_client::<(BufReader<DuplexStream>, DuplexStream), _>(
            StubService::returning(json!({})),
            || Err(McpError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))),
        );

    match result {
        Err(McpError::Transport(message)) => assert!(message.contains("closed")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("transport failure was swallowed"),
    }
}

#[test]
fn test_connected_lifecycle_serves_until_input_closes() {
    let stub = StubService::returning(json!({"data": []}));
    let (client_in, server_in) = tokio::io::duplex(4096);
    let (server_out, client_out) = tokio::io::duplex(4096);

    tokio_test::block_on(async move {
        let connected = Lifecycle::new()
            .check_credentials(with_key)
            .unwrap()
            .connect_with_client(stub.clone(), || Ok((BufReader::new(server_in), server_out)))
            .unwrap();
        assert_eq!(connected.phase(), Phase::TransportConnected);

        let serving = tokio::spawn(connected.serve());

        let mut client_in = client_in;
        client_in
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"resources/list\"}\n")
            .await
            .unwrap();
        drop(client_in);

        serving.await.unwrap().unwrap();

        let line = BufReader::new(client_out).lines().next_line().await.unwrap().unwrap();
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["result"], json!({"resources": []}));
        assert_eq!(stub.calls().len(), 1);
    });
}

#[test]
fn test_binary_exits_nonzero_without_credential() {
    let output = Command::new(BIN)
        .env_remove("ATTIO_API_KEY")
        .env_remove("ATTIO_BASE_URL")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_answers_on_stdout_and_exits_cleanly() {
    let mut child = Command::new(BIN)
        .env("ATTIO_API_KEY", "test-key")
        .env_remove("ATTIO_BASE_URL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n")
            .unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let response: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 9);
}
