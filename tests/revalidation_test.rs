//! Integration tests for throttled session revalidation.

mod common;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_client, user_json};
use remark_client::adapters::mock::SessionEvent;
use remark_client::auth::Revalidation;

async fn mount_user(server: &MockServer, body: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_startup_check_is_throttled() {
    let server = MockServer::start().await;
    mount_user(&server, Value::Null, 0).await;

    let t = test_client(&server);
    assert!(matches!(
        t.client.scheduler().start(),
        Revalidation::Throttled { .. }
    ));
}

#[tokio::test]
async fn test_two_signals_within_window_make_one_request() {
    let server = MockServer::start().await;
    mount_user(&server, user_json("github_1", "ann"), 1).await;

    let t = test_client(&server);
    t.clock.advance(chrono::Duration::seconds(60));

    let Revalidation::Started(handle) = t.client.scheduler().handle_visibility_change() else {
        panic!("first signal should revalidate");
    };
    let user = handle.await.unwrap().unwrap();
    assert_eq!(user.name, "ann");

    t.clock.advance(chrono::Duration::seconds(59));
    assert!(matches!(
        t.client.scheduler().handle_visibility_change(),
        Revalidation::Throttled { .. }
    ));
    assert_eq!(
        t.observer.events(),
        vec![SessionEvent::Established(user)]
    );
}

#[tokio::test]
async fn test_offline_makes_no_request() {
    let server = MockServer::start().await;
    mount_user(&server, Value::Null, 0).await;

    let t = test_client(&server);
    t.clock.advance(chrono::Duration::minutes(10));
    t.browser.set_online(false);

    for _ in 0..3 {
        assert!(matches!(
            t.client.scheduler().handle_visibility_change(),
            Revalidation::Offline
        ));
    }
}

#[tokio::test]
async fn test_hidden_page_makes_no_request() {
    let server = MockServer::start().await;
    mount_user(&server, Value::Null, 0).await;

    let t = test_client(&server);
    t.clock.advance(chrono::Duration::minutes(10));
    t.browser.set_visible(false);

    assert!(matches!(
        t.client.scheduler().handle_visibility_change(),
        Revalidation::Hidden
    ));
}

#[tokio::test]
async fn test_failed_revalidation_reports_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let t = test_client(&server);
    t.client.scheduler().rewind();

    let Revalidation::Started(handle) = t.client.scheduler().handle_visibility_change() else {
        panic!("rewound scheduler should revalidate");
    };
    assert!(handle.await.unwrap().is_none());
    assert_eq!(t.observer.events(), vec![SessionEvent::Cleared]);

    // No retry until the window passes again.
    assert!(!t.client.scheduler().handle_visibility_change().is_started());
}
