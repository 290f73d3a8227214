//! Common test utilities for integration tests.
//!
//! Every test talks to a real `wiremock` server through the reqwest
//! transport; only the browser environment, the clock and the session
//! observer are doubles.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::sync::Arc;
use wiremock::MockServer;

use remark_client::adapters::mock::{MockBrowser, MockClock, RecordingObserver};
use remark_client::adapters::ReqwestHttpClient;
use remark_client::{ClientConfig, RemarkClient};

pub const PAGE_URL: &str = "https://blog.example.com/posts/1";
pub const SITE_ID: &str = "remark";

/// Client wired to a mock server plus handles on its doubles.
pub struct TestClient {
    pub client: RemarkClient,
    pub browser: MockBrowser,
    pub clock: MockClock,
    pub observer: RecordingObserver,
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_site_id(SITE_ID)
        .with_page_url(PAGE_URL)
}

pub fn test_client(server: &MockServer) -> TestClient {
    test_client_with(test_config(server))
}

pub fn test_client_with(config: ClientConfig) -> TestClient {
    let browser = MockBrowser::new();
    let clock = MockClock::default();
    let observer = RecordingObserver::new();
    let client = RemarkClient::builder(config)
        .http(Arc::new(ReqwestHttpClient::new()))
        .browser(Arc::new(browser.clone()))
        .clock(Arc::new(clock.clone()))
        .observer(Arc::new(observer.clone()))
        .build();
    TestClient {
        client,
        browser,
        clock,
        observer,
    }
}

/// Unsigned JWT carrying `claims` as its payload.
pub fn jwt(claims: &str) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims),
        URL_SAFE_NO_PAD.encode("fake-signature")
    )
}

/// Verification code expiring `offset_secs` after `clock`'s current time.
pub fn code_expiring_in(clock: &MockClock, offset_secs: i64) -> String {
    use remark_client::traits::Clock;
    let exp = clock.now().timestamp() + offset_secs;
    jwt(&format!(r#"{{"exp":{},"aud":"remark"}}"#, exp))
}

pub fn user_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "picture": "",
        "ip": "",
        "admin": false,
        "block": false,
        "verified": false
    })
}
