//! Attio client tests against a local mock HTTP server

use attio_client::{AttioClient, ClientConfig, HttpMethod, RemoteService};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> AttioClient {
    let config = ClientConfig::new(server.url(), "test-key").unwrap();
    AttioClient::new(config).unwrap()
}

#[tokio::test]
async fn test_get_returns_parsed_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/objects/companies/records/rec-1")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"id":{"record_id":"rec-1"}}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let data = client.get("/objects/companies/records/rec-1").await.unwrap();

    assert_eq!(data, json!({"data": {"id": {"record_id": "rec-1"}}}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/objects/companies/records/query")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"filter": {"name": {"$contains": "Acme"}}})))
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let data = client
        .post(
            "/objects/companies/records/query",
            json!({"filter": {"name": {"$contains": "Acme"}}}),
        )
        .await
        .unwrap();

    assert_eq!(data, json!({"data": []}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_becomes_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/notes")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_header("x-request-id", "req-42")
        .with_body(r#"{"status_code":400,"type":"invalid_request_error","message":"Bad parent"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let failure = client.post("/notes", json!({"data": {}})).await.unwrap_err();

    assert_eq!(failure.method, HttpMethod::Post);
    assert_eq!(failure.url, format!("{}/notes", server.url()));
    assert_eq!(failure.status, Some(400));
    assert_eq!(failure.message, "Request failed with status code 400");
    assert_eq!(failure.headers.get("x-request-id").map(String::as_str), Some("req-42"));
    assert_eq!(failure.data["message"], "Bad parent");
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_as_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/workspace_members")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let client = client_for(&server);
    let failure = client.get("/workspace_members").await.unwrap_err();

    assert_eq!(failure.status, Some(502));
    assert_eq!(failure.data, json!("Bad Gateway"));
}

#[tokio::test]
async fn test_connection_failure_has_no_status() {
    let config = ClientConfig::new("http://127.0.0.1:1", "test-key").unwrap();
    let client = AttioClient::new(config).unwrap();

    let failure = client.get("/workspace_members").await.unwrap_err();

    assert_eq!(failure.method, HttpMethod::Get);
    assert_eq!(failure.url, "http://127.0.0.1:1/workspace_members");
    assert!(failure.status.is_none());
    assert!(!failure.message.is_empty());
}

#[test]
fn test_client_config_resolves_paths() {
    let config = ClientConfig::new("https://api.attio.com/v2/", "k").unwrap();
    let client = AttioClient::new(config).unwrap();

    assert_eq!(
        client.config().url_for("/objects/deals/records/d-1"),
        "https://api.attio.com/v2/objects/deals/records/d-1"
    );
}
