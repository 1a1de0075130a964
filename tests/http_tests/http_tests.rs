//! HTTP Adapter Tests
//!
//! Runs the real router on an ephemeral port and drives it with reqwest.

use std::fs;
use std::sync::Arc;

use docukv::config::{Config, DeleteMode};
use docukv::engine::KvStore;
use docukv::network::{Server, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

async fn start_server(config: Config) -> String {
    let store = Arc::new(KvStore::open(config).unwrap());
    let server = Server::bind("127.0.0.1:0", store).await.unwrap();
    let addr = server.local_addr();
    tokio::spawn(server.run_until(std::future::pending()));
    format!("http://{}", addr)
}

async fn setup() -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let base = start_server(Config::builder().storage_dir(temp_dir.path()).build()).await;
    (temp_dir, base)
}

fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn json_body(resp: reqwest::Response) -> Value {
    serde_json::from_str(&resp.text().await.unwrap()).unwrap()
}

// =============================================================================
// Route Tests
// =============================================================================

#[tokio::test]
async fn test_root_returns_demo_json() {
    let (_temp, base) = setup().await;

    let resp = reqwest::get(format!("{}/", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON_CONTENT_TYPE);
    assert_eq!(json_body(resp).await, json!({ "key": "value" }));
}

#[tokio::test]
async fn test_post_then_get_returns_raw_value() {
    let (_temp, base) = setup().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/key/greeting", base))
        .body("hello, world")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON_CONTENT_TYPE);
    assert_eq!(json_body(resp).await, json!({ "status": "success" }));

    let resp = client
        .get(format!("{}/key/greeting", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), TEXT_CONTENT_TYPE);
    assert_eq!(resp.text().await.unwrap(), "hello, world");
}

#[tokio::test]
async fn test_get_missing_key_is_empty_200() {
    let (_temp, base) = setup().await;

    let resp = reqwest::get(format!("{}/key/missing", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_percent_encoded_key() {
    let (temp, base) = setup().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/key/a%2Fb%20c", base))
        .body("v")
        .send()
        .await
        .unwrap();

    let store = KvStore::open(Config::builder().storage_dir(temp.path()).build()).unwrap();
    assert_eq!(store.get("a/b c").unwrap(), "v");
}

#[tokio::test]
async fn test_delete_returns_success_but_key_survives() {
    let (_temp, base) = setup().await;
    let client = reqwest::Client::new();
    let url = format!("{}/key/k", base);

    client.post(&url).body("v").send().await.unwrap();
    let resp = client.delete(&url).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "status": "success" }));
    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "v");
}

#[tokio::test]
async fn test_delete_with_persist_mode_removes_key() {
    let temp_dir = TempDir::new().unwrap();
    let base = start_server(
        Config::builder()
            .storage_dir(temp_dir.path())
            .delete_mode(DeleteMode::Persist)
            .build(),
    )
    .await;
    let client = reqwest::Client::new();
    let url = format!("{}/key/k", base);

    client.post(&url).body("v").send().await.unwrap();
    client.delete(&url).send().await.unwrap();

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_temp, base) = setup().await;

    let resp = reqwest::get(format!("{}/nope", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_key_segment_is_404() {
    let (_temp, base) = setup().await;

    let resp = reqwest::get(format!("{}/key/", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_large_body_is_stored() {
    let (_temp, base) = setup().await;
    let client = reqwest::Client::new();
    let url = format!("{}/key/big", base);
    let value = "x".repeat(3 * 1024 * 1024);

    let resp = client.post(&url).body(value.clone()).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "status": "success" }));

    let resp = client.get(&url).send().await.unwrap();
    let stored = resp.text().await.unwrap();
    assert_eq!(stored.len(), value.len());
    assert!(stored == value);
}

// =============================================================================
// Error Tests
// =============================================================================

#[tokio::test]
async fn test_corrupt_file_is_500_with_error_json() {
    let (temp, base) = setup().await;
    fs::write(temp.path().join("data.json"), b"not json").unwrap();
    let client = reqwest::Client::new();
    let url = format!("{}/key/k", base);

    let responses = vec![
        client.get(&url).send().await.unwrap(),
        client.post(&url).body("v").send().await.unwrap(),
        client.delete(&url).send().await.unwrap(),
    ];

    for resp in responses {
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type(&resp), JSON_CONTENT_TYPE);
        let body = json_body(resp).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Decode error"), "got {}", message);
    }
}

#[tokio::test]
async fn test_non_utf8_body_is_500() {
    let (_temp, base) = setup().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/key/bin", base))
        .body(vec![0xff, 0xfe, 0x00])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&resp), JSON_CONTENT_TYPE);
    assert!(json_body(resp).await["error"].is_string());
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_graceful_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().storage_dir(temp_dir.path()).build();
    let store = Arc::new(KvStore::open(config).unwrap());
    let server = Server::bind("127.0.0.1:0", store).await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(server.run_until(async move {
        let _ = rx.await;
    }));
    tx.send(()).unwrap();

    handle.await.unwrap().unwrap();
}
