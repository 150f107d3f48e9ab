//! Common test utilities for billtrace integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;

use billtrace_service::{create_router, AppState, ServiceConfig};
use billtrace_store::JsonStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the store (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh JSON store and default
    /// configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness after customizing the configuration (cooldown
    /// window, provider URLs, etc.).
    pub fn with_config(customize: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let mut config = ServiceConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            // Unroutable provider endpoints with a short timeout so a test
            // that accidentally reaches for the network fails fast.
            ipapi_base_url: "http://127.0.0.1:9".into(),
            ipapi_com_base_url: "http://127.0.0.1:9".into(),
            nominatim_base_url: "http://127.0.0.1:9".into(),
            provider_timeout_seconds: 1,
            ..ServiceConfig::default()
        };
        customize(&mut config);

        let store = Arc::new(JsonStore::open(&config.data_dir));
        let state = AppState::new(store, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Register a valid bill.
    pub async fn register_bill(&self, serial: &str, value: u32) {
        self.server
            .post("/api/valid-bills")
            .json(&serde_json::json!({
                "serial_number": serial,
                "bill_value": value
            }))
            .await
            .assert_status_ok();
    }

    /// Submit a track request.
    pub async fn track(&self, serial: &str, city: &str, state: &str, date: &str) -> TestResponse {
        self.server
            .post("/api/track-bill")
            .json(&serde_json::json!({
                "serialNumber": serial,
                "city": city,
                "state": state,
                "date": date
            }))
            .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
