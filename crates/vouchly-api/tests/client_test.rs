#![allow(clippy::unwrap_used)]
// Integration tests for `HotspotClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vouchly_api::{ControllerPlatform, Error, HotspotClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HotspotClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = HotspotClient::with_client(
        reqwest::Client::new(),
        base_url,
        "default".into(),
        ControllerPlatform::ClassicController,
    );
    (server, client)
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Voucher listing tests ───────────────────────────────────────────

#[tokio::test]
async fn test_list_vouchers() {
    let (server, client) = setup().await;

    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [{
            "_id": "6643a3e8f1e6c70588b4a1d2",
            "code": "47283-9174",
            "create_time": 1_715_700_000,
            "quota": 1,
            "used": 0,
            "duration": 480,
            "note": "front desk",
            "status": "VALID_ONE"
        }]
    });

    Mock::given(method("GET"))
        .and(path(site_path("stat/voucher")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let vouchers = client.list_vouchers().await.unwrap();

    assert_eq!(vouchers.len(), 1);
    assert_eq!(vouchers[0].code, "47283-9174");
    assert_eq!(vouchers[0].quota, 1);
    assert_eq!(vouchers[0].duration, 480);
    assert_eq!(vouchers[0].note.as_deref(), Some("front desk"));
    assert_eq!(vouchers[0].status.as_deref(), Some("VALID_ONE"));
}

#[tokio::test]
async fn test_list_vouchers_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/voucher")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // A 401 mid-session means the cookie expired, not bad credentials.
    let err = client.list_vouchers().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_list_vouchers_envelope_error() {
    let (server, client) = setup().await;

    let envelope = json!({
        "meta": { "rc": "error", "msg": "api.err.NoSiteContext" },
        "data": []
    });

    Mock::given(method("GET"))
        .and(path(site_path("stat/voucher")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let result = client.list_vouchers().await;
    match result {
        Err(Error::Api { message }) => assert_eq!(message, "api.err.NoSiteContext"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_vouchers_unifi_os_error_shape() {
    let (server, client) = setup().await;

    // UniFi OS can return an error object with HTTP 200.
    let body = json!({
        "error": { "code": 401, "message": "Unauthorized" }
    });

    Mock::given(method("GET"))
        .and(path(site_path("stat/voucher")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = client.list_vouchers().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Voucher mutation tests ──────────────────────────────────────────

#[tokio::test]
async fn test_create_vouchers_posts_command_body() {
    let (server, client) = setup().await;

    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [{ "create_time": 1_715_700_123 }]
    });

    Mock::given(method("POST"))
        .and(path(site_path("cmd/hotspot")))
        .and(body_partial_json(json!({
            "cmd": "create-voucher",
            "n": 5,
            "quota": 1,
            "expire": 480
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .expect(1)
        .mount(&server)
        .await;

    let req = vouchly_api::CreateVoucherRequest {
        count: 5,
        quota: 1,
        duration_minutes: 480,
        ..Default::default()
    };

    let results = client.create_vouchers(&req).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].create_time, 1_715_700_123);
}

#[tokio::test]
async fn test_delete_voucher() {
    let (server, client) = setup().await;

    let envelope = json!({ "meta": { "rc": "ok" }, "data": [] });

    Mock::given(method("POST"))
        .and(path(site_path("cmd/hotspot")))
        .and(body_partial_json(json!({
            "cmd": "delete-voucher",
            "_id": "6643a3e8f1e6c70588b4a1d2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_voucher("6643a3e8f1e6c70588b4a1d2")
        .await
        .unwrap();
}

// ── Platform detection tests ────────────────────────────────────────

#[tokio::test]
async fn test_detect_platform_unifi_os() {
    let server = MockServer::start().await;

    // UniFi OS answers (even with 401) at /api/auth/login.
    Mock::given(method("GET"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let platform = HotspotClient::detect_platform(&base_url, &TransportConfig::default())
        .await
        .unwrap();
    assert_eq!(platform, ControllerPlatform::UnifiOs);
}

#[tokio::test]
async fn test_detect_platform_standalone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let platform = HotspotClient::detect_platform(&base_url, &TransportConfig::default())
        .await
        .unwrap();
    assert_eq!(platform, ControllerPlatform::ClassicController);
}

// ── Transport tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_slow_controller_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/voucher")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig {
        timeout: Duration::from_millis(100),
        ..TransportConfig::default()
    };
    let client = HotspotClient::new(
        Url::parse(&server.uri()).unwrap(),
        "default".into(),
        ControllerPlatform::ClassicController,
        &transport,
    )
    .unwrap();

    let err = client.list_vouchers().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(err.is_transient());
}
