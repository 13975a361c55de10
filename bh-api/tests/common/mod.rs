//! Shared test utilities for integration tests.

use std::time::Duration;

use bh_api::{ApiClient, RetryConfig};
use bh_core::config::BullhornConfig;
use wiremock::MockServer;

/// Token used by every mocked session.
pub const TOKEN: &str = "12345_1234567_a12345bc-123a-45bc-67de-12345678910a";

/// Retry policy with millisecond delays so retry tests stay fast.
pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        jitter: false,
    }
}

/// Connection config pointing at `rest_url` with a short request timeout.
pub fn test_config(rest_url: &str) -> BullhornConfig {
    BullhornConfig {
        rest_url: rest_url.to_string(),
        session_token: TOKEN.to_string(),
        api_timeout_ms: 300,
        connect_timeout_ms: 300,
    }
}

/// Create a client talking to the mock server.
pub fn create_test_client(server: &MockServer, max_attempts: u32) -> ApiClient {
    ApiClient::new(&test_config(&server.uri()))
        .expect("failed to build test client")
        .with_retry_config(fast_retry(max_attempts))
}

/// A search envelope as Bullhorn returns it, `_score` included.
pub fn search_body(records: serde_json::Value) -> serde_json::Value {
    let count = records.as_array().map(|a| a.len()).unwrap_or(0);
    serde_json::json!({
        "total": count,
        "start": 0,
        "count": count,
        "data": records,
    })
}
