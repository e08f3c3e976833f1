//! Test helpers: build the router for integration tests.
//!
//! The app runs on a temporary local store and the in-memory audit log, so no external
//! service is needed: `cargo test -p scanvault-api`.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use scanvault_api::constants;
use scanvault_api::setup::{routes, services};
use scanvault_core::{Config, ScanConfig};
use scanvault_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test app, adjusting the default development config first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut ScanConfig)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut scan_config = ScanConfig {
        local_storage_path: temp_dir.path().display().to_string(),
        ..ScanConfig::default()
    };
    configure(&mut scan_config);
    let config = Config(Box::new(scan_config));

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let state = services::initialize_services(&config, None, storage)
        .expect("Failed to initialize services");
    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, temp_dir }
}

/// Multipart body with both fields set.
pub fn scan_form(username: &str, filename: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_text("username", username.to_string()).add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_type("application/octet-stream"),
    )
}
