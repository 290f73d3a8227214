//! Integration tests for the session-aware fetcher.
//!
//! These tests run the fetcher over reqwest against a wiremock server and
//! verify:
//! - Anti-forgery and session token headers
//! - Token rotation and clearing on 403
//! - Error classification
//! - Clock skew tracking from the `Date` header
//! - `site` query handling and multipart uploads

mod common;

use chrono::TimeZone;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_client, test_client_with, test_config, user_json};
use remark_client::fetcher::{
    FetchError, RequestOptions, TRANSPORT_ERROR_CODE, UNEXPECTED_ERROR_MESSAGE,
    UNPARSEABLE_ERROR_CODE,
};
use remark_client::models::User;
use remark_client::{ClientConfig, Fetcher, RemarkClient};

async fn get_user(fetcher: &Fetcher) -> Result<Option<User>, FetchError> {
    fetcher.get("/user", RequestOptions::new()).await
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_xsrf_cookie_is_sent_as_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(query_param("site", "remark"))
        .and(header("X-XSRF-TOKEN", "xsrf-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let t = test_client(&server);
    t.browser.set_cookie("XSRF-TOKEN", "xsrf-123");

    let user = get_user(t.client.fetcher()).await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_default_client_echoes_server_xsrf_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "XSRF-TOKEN=srv-xsrf; Path=/")
                .set_body_json(json!({"auth_providers": []})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(header("X-XSRF-TOKEN", "srv-xsrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemarkClient::builder(test_config(&server)).build();
    client.comments().config().await.unwrap();

    let user = get_user(client.fetcher()).await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_token_attached_only_while_held() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-JWT", "token-1")
                .set_body_json(user_json("anonymous_1", "bob")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("anonymous_1", "bob")))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let fetcher = t.client.fetcher();

    get_user(fetcher).await.unwrap();
    assert_eq!(fetcher.session().tokens().get().as_deref(), Some("token-1"));
    get_user(fetcher).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("x-jwt").is_none());
    assert_eq!(requests[1].headers.get("x-jwt").unwrap(), "token-1");
}

#[tokio::test]
async fn test_rotation_overwrites_token() {
    let server = MockServer::start().await;
    for token in ["token-1", "token-2"] {
        Mock::given(method("GET"))
            .and(path("/api/v1/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-JWT", token)
                    .set_body_json(Value::Null),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }

    let t = test_client(&server);
    let fetcher = t.client.fetcher();

    get_user(fetcher).await.unwrap();
    get_user(fetcher).await.unwrap();
    assert_eq!(fetcher.session().tokens().get().as_deref(), Some("token-2"));
}

#[tokio::test]
async fn test_forbidden_clears_token_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-JWT", "token-1")
                .set_body_json(Value::Null),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "blocked user"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    let t = test_client(&server);
    let fetcher = t.client.fetcher();
    get_user(fetcher).await.unwrap();

    let err = get_user(fetcher).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::MappedStatus {
            status: 403,
            message: "Forbidden."
        }
    );
    assert!(!fetcher.session().tokens().is_held());

    // Without a token the next 403 has nothing to clear.
    let err = get_user(fetcher).await.unwrap_err();
    assert_eq!(err.code(), 403);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[1].headers.get("x-jwt").unwrap(), "token-1");
    assert!(requests[2].headers.get("x-jwt").is_none());
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_mapped_statuses_ignore_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": "slow down"})))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let err = get_user(t.client.fetcher()).await.unwrap_err();
    assert_eq!(err.to_string(), "You have reached maximum request limit.");
    assert_eq!(err.code(), 429);
    assert!(err.payload().is_none());
}

#[tokio::test]
async fn test_application_payload_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(451).set_body_json(json!({"code": 1, "msg": "blocked"})))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let err = get_user(t.client.fetcher()).await.unwrap_err();
    assert_eq!(err.status(), Some(451));
    assert_eq!(err.payload(), Some(&json!({"code": 1, "msg": "blocked"})));
}

#[tokio::test]
async fn test_non_json_error_is_unparseable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let err = get_user(t.client.fetcher()).await.unwrap_err();
    assert_eq!(err.code(), UNPARSEABLE_ERROR_CODE);
    assert_eq!(err.to_string(), UNEXPECTED_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_transport_failure() {
    // Nothing listens on port 1.
    let t = test_client_with(ClientConfig::default().with_base_url("http://127.0.0.1:1"));
    let err = get_user(t.client.fetcher()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.code(), TRANSPORT_ERROR_CODE);
    assert!(!t.client.session().tokens().is_held());
}

#[tokio::test]
async fn test_success_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/preview"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"text": "**hi**"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p><strong>hi</strong></p>"))
        .expect(1)
        .mount(&server)
        .await;

    let t = test_client(&server);
    let html = t.client.comments().preview("**hi**").await.unwrap();
    assert_eq!(html, "<p><strong>hi</strong></p>");
}

#[tokio::test]
async fn test_success_body_of_wrong_shape_is_unparseable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let err = get_user(t.client.fetcher()).await.unwrap_err();
    assert_eq!(err.code(), UNPARSEABLE_ERROR_CODE);
}

// ============================================================================
// Clock skew
// ============================================================================

#[tokio::test]
async fn test_clock_skew_from_date_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Date", "Fri, 01 Mar 2024 12:00:00 GMT")
                .set_body_json(json!({"auth_providers": []})),
        )
        .mount(&server)
        .await;

    let t = test_client(&server);
    t.clock
        .set(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 30).unwrap());

    t.client.comments().config().await.unwrap();
    assert_eq!(t.client.session().clock_skew().seconds(), 30.0);
}

// ============================================================================
// URL building
// ============================================================================

#[tokio::test]
async fn test_post_has_no_site_param() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/counts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "u", "count": 3}])))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let counts = t
        .client
        .comments()
        .comments_count(&["u".to_string()])
        .await
        .unwrap();
    assert_eq!(counts[0].count, 3);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_empty_site_id_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(query_param("site", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let t = test_client_with(test_config(&server).with_site_id(""));
    get_user(t.client.fetcher()).await.unwrap();
}

#[tokio::test]
async fn test_auth_endpoints_use_bare_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/logout"))
        .and(query_param("site", "remark"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let t = test_client(&server);
    t.client.logout().await.unwrap();
}

#[tokio::test]
async fn test_picture_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/picture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "remark/abc.png"})))
        .mount(&server)
        .await;

    let t = test_client(&server);
    let image = t
        .client
        .comments()
        .upload_image("cat.png", "image/png", vec![137u8, 80, 78, 71])
        .await
        .unwrap();
    assert_eq!(image.size, 4);
    assert!(image.url.ends_with("/api/v1/picture/remark/abc.png"));

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"cat.png\""));
}
