//! Scan API integration tests.
//!
//! Run with: `cargo test -p scanvault-api --test scan_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, scan_form, setup_test_app, setup_test_app_with};
use scanvault_core::{open, sha256_hex, OneTimeKey};
use serde_json::Value;

const HELLO_WORLD_SHA256: &str =
    "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

#[tokio::test]
async fn test_clean_upload_is_encrypted_and_stored() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("alice", "greeting.txt", b"hello world"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "clean");
    assert_eq!(body["sha256"], HELLO_WORLD_SHA256);
    let storage_path = body["storage_path"].as_str().unwrap();
    assert_eq!(
        storage_path,
        format!("alice/{}_greeting.txt.enc", HELLO_WORLD_SHA256)
    );
    let key_hex = body["encryption_key"].as_str().unwrap();
    assert_eq!(key_hex.len(), 64);

    // The stored blob opens with the returned key and nothing else is kept
    let blob = std::fs::read(app.temp_dir.path().join(storage_path)).unwrap();
    assert_ne!(blob.as_slice(), b"hello world");
    let key = OneTimeKey::from_hex(key_hex).unwrap();
    assert_eq!(open(&key, &blob).unwrap(), b"hello world");
}

#[tokio::test]
async fn test_trigger_pattern_is_rejected_and_logged() {
    let app = setup_test_app().await;
    let content = b"please run DEMO_TRIGGER now";

    let response = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("mallory", "run.sh", content))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "malicious");
    assert_eq!(body["reason"], "pattern match");
    assert_eq!(body["sha256"], sha256_hex(content));
    assert!(body.get("storage_path").is_none());
    assert!(body.get("encryption_key").is_none());

    let logs: Value = app.client().get(&api_path("/uploads")).await.json();
    let logs = logs["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["status"], "malicious");
    assert_eq!(logs[0]["username"], "mallory");
    assert!(logs[0]["storage_path"].is_null());
}

#[tokio::test]
async fn test_missing_fields_are_bad_requests() {
    let app = setup_test_app().await;

    let no_file = MultipartForm::new().add_text("username", "alice");
    let response = app.client().post(&api_path("/scan")).multipart(no_file).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["error"], "Missing file");

    let no_username =
        MultipartForm::new().add_part("file", Part::bytes(b"data".to_vec()).file_name("a.txt"));
    let response = app
        .client()
        .post(&api_path("/scan"))
        .multipart(no_username)
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing username");

    let empty = scan_form("alice", "empty.txt", b"");
    let response = app.client().post(&api_path("/scan")).multipart(empty).await;
    assert_eq!(response.status_code(), 400);

    let traversal = scan_form("alice", "../escape.txt", b"data");
    let response = app.client().post(&api_path("/scan")).multipart(traversal).await;
    assert_eq!(response.status_code(), 400);

    // Rejected requests leave no audit record
    let logs: Value = app.client().get(&api_path("/uploads")).await.json();
    assert!(logs["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_size_limit_boundary() {
    let app = setup_test_app_with(|c| c.max_file_size_bytes = 16).await;

    let at_limit = scan_form("alice", "max.bin", &[b'a'; 16]);
    let response = app.client().post(&api_path("/scan")).multipart(at_limit).await;
    assert_eq!(response.status_code(), 200);

    let over_limit = scan_form("alice", "over.bin", &[b'b'; 17]);
    let response = app.client().post(&api_path("/scan")).multipart(over_limit).await;
    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");

    let logs: Value = app.client().get(&api_path("/uploads")).await.json();
    assert_eq!(logs["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected_as_json() {
    let app = setup_test_app_with(|c| c.max_file_size_bytes = 16).await;
    let body = vec![b'c'; 70_000];

    let response = app
        .client()
        .post(&api_path("/scan"))
        .content_type("multipart/form-data; boundary=X")
        .add_header("content-length", "70000")
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].is_string());

    let logs: Value = app.client().get(&api_path("/uploads")).await.json();
    assert!(logs["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dotted_filename_is_stored() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("bob..smith", "report.", b"hello world"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "clean");
    let storage_path = body["storage_path"].as_str().unwrap();
    assert_eq!(
        storage_path,
        format!("bob..smith/{}_report..enc", HELLO_WORLD_SHA256)
    );
    assert!(app.temp_dir.path().join(storage_path).exists());
}

#[tokio::test]
async fn test_repeat_upload_conflicts() {
    let app = setup_test_app().await;

    let first = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("bob", "notes.txt", b"same bytes"))
        .await;
    assert_eq!(first.status_code(), 200);

    let second = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("bob", "notes.txt", b"same bytes"))
        .await;
    assert_eq!(second.status_code(), 409);
    let body: Value = second.json();
    assert_eq!(body["code"], "ALREADY_STORED");

    // Same content for another user is a different key
    let other_user = app
        .client()
        .post(&api_path("/scan"))
        .multipart(scan_form("carol", "notes.txt", b"same bytes"))
        .await;
    assert_eq!(other_user.status_code(), 200);

    let logs: Value = app.client().get(&api_path("/uploads")).await.json();
    let clean_for_bob = logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["username"] == "bob" && r["status"] == "clean")
        .count();
    assert_eq!(clean_for_bob, 1);
}

#[tokio::test]
async fn test_uploads_listed_newest_first() {
    let app = setup_test_app().await;

    for (name, content) in [
        ("one.txt", &b"first"[..]),
        ("two.txt", b"second DEMO_TRIGGER"),
        ("three.txt", b"third"),
    ] {
        let response = app
            .client()
            .post(&api_path("/scan"))
            .multipart(scan_form("dave", name, content))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let response = app.client().get(&api_path("/uploads")).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let logs = body["logs"].as_array().unwrap();

    let names: Vec<&str> = logs.iter().map(|r| r["filename"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["three.txt", "two.txt", "one.txt"]);
    assert_eq!(logs[1]["status"], "malicious");
    assert_eq!(logs[0]["file_size"], 5);
    for record in logs {
        assert_eq!(
            record["storage_path"].is_null(),
            record["status"] == "malicious"
        );
    }
}

#[tokio::test]
async fn test_missing_filename_defaults_to_unknown() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("username", "erin")
        .add_part("file", Part::bytes(b"no name".to_vec()));
    let response = app.client().post(&api_path("/scan")).multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["storage_path"].as_str().unwrap().ends_with("_unknown.enc"));
}

#[tokio::test]
async fn test_health_reports_backends() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage_backend"], "local");
    assert_eq!(body["audit_log_backend"], "memory");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "req-123")
        .await;
    assert_eq!(response.header("x-request-id"), "req-123");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert_eq!(response.header("cache-control"), "no-store, private");

    let generated = app.client().get("/health").await;
    let request_id = generated.header("x-request-id");
    assert!(uuid_like(request_id.to_str().unwrap()));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"].get("/api/v0/scan").is_some());
    assert!(body["paths"].get("/api/v0/uploads").is_some());
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}
