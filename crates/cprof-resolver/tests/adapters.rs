//! Integration tests for the direct-fetch adapters against wiremock servers.

use cprof_core::{OfficialApiCredentials, PayloadSchema, Platform};
use cprof_resolver::{AdapterError, OfficialApiAdapter, ProfileAdapter, PublicPageAdapter};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    cprof_resolver::build_http_client(5, "cprof-test/0.1").expect("client should build")
}

fn credentials() -> Option<OfficialApiCredentials> {
    Some(OfficialApiCredentials {
        client_key: "key-1".to_string(),
        client_secret: "secret-1".to_string(),
    })
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/oauth/token/"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_key=key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "clt.token",
            "expires_in": 7200,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Official API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn official_adapter_without_credentials_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let adapter = OfficialApiAdapter::with_base_url(http(), None, &server.uri());
    let err = adapter.fetch("sample_user").await.unwrap_err();

    assert!(matches!(err, AdapterError::Unavailable { .. }));
}

#[tokio::test]
async fn official_adapter_exchanges_token_then_queries_user_info() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/v2/research/user/info/"))
        .and(query_param(
            "fields",
            "display_name,bio_description,avatar_url,is_verified,follower_count,following_count,likes_count,video_count",
        ))
        .and(header("authorization", "Bearer clt.token"))
        .and(body_json(json!({"username": "sample_user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"display_name": "Sample", "follower_count": 1200, "video_count": 30},
            "error": {"code": "ok", "message": "", "log_id": "abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OfficialApiAdapter::with_base_url(http(), credentials(), &server.uri());
    let payload = adapter.fetch("sample_user").await.expect("fetch should succeed");

    assert_eq!(payload.schema, PayloadSchema::TiktokOfficial);
    assert_eq!(payload.body["data"]["follower_count"], 1200);
}

#[tokio::test]
async fn official_adapter_maps_404_to_not_found() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/v2/research/user/info/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let adapter = OfficialApiAdapter::with_base_url(http(), credentials(), &server.uri());
    let err = adapter.fetch("ghost").await.unwrap_err();

    assert!(matches!(err, AdapterError::NotFound { ref handle, .. } if handle == "ghost"));
}

#[tokio::test]
async fn official_adapter_treats_error_envelope_as_transient() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/v2/research/user/info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "error": {"code": "rate_limit_exceeded", "message": "slow down"}
        })))
        .mount(&server)
        .await;

    let adapter = OfficialApiAdapter::with_base_url(http(), credentials(), &server.uri());
    let err = adapter.fetch("sample_user").await.unwrap_err();

    match err {
        AdapterError::Transient { message, .. } => assert!(message.contains("rate_limit_exceeded")),
        other => panic!("expected Transient, got {other:?}"),
    }
}

#[tokio::test]
async fn official_adapter_reports_rejected_token_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/oauth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client key or secret is incorrect."
        })))
        .mount(&server)
        .await;

    let adapter = OfficialApiAdapter::with_base_url(http(), credentials(), &server.uri());
    let err = adapter.fetch("sample_user").await.unwrap_err();

    match err {
        AdapterError::Transient { message, .. } => assert!(message.contains("invalid_client")),
        other => panic!("expected Transient, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Public page scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_adapter_extracts_embedded_counts() {
    let server = MockServer::start().await;
    let html = r#"<html><script>window.__STATE__={"user":{"uniqueId":"dancer","nickname":"Dancer",
        "verified":false},"stats":{"followerCount":5400,"followingCount":12,"heartCount":81000,
        "videoCount":27}}</script></html>"#;

    Mock::given(method("GET"))
        .and(path("/@dancer"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let adapter = PublicPageAdapter::with_base_url(Platform::TikTok, http(), &server.uri());
    let payload = adapter.fetch("dancer").await.expect("fetch should succeed");

    assert_eq!(adapter.id(), "tiktok-public-page");
    assert_eq!(payload.schema, PayloadSchema::ScrapedPage);
    assert_eq!(payload.body["followerCount"], 5400);
    assert_eq!(payload.body["postCount"], 27);
    assert_eq!(payload.body["totalLikes"], 81000);
    assert_eq!(payload.body["displayName"], "Dancer");
}

#[tokio::test]
async fn scrape_adapter_falls_back_to_meta_description() {
    let server = MockServer::start().await;
    let html = r#"<html><head>
        <meta content="12.5K Followers, 300 Following, 410 Posts" name="description" />
        <meta name="description" content="12.5K Followers, 300 Following, 410 Posts - See Instagram photos" />
        </head><body></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/natgeo/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let adapter = PublicPageAdapter::with_base_url(Platform::Instagram, http(), &server.uri());
    let payload = adapter.fetch("natgeo").await.expect("fetch should succeed");

    assert_eq!(payload.body["followerCount"], 12_500);
    assert_eq!(payload.body["followingCount"], 300);
    assert_eq!(payload.body["postCount"], 410);
}

#[tokio::test]
async fn scrape_adapter_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let adapter = PublicPageAdapter::with_base_url(Platform::YouTube, http(), &server.uri());
    let err = adapter.fetch("nobody").await.unwrap_err();

    assert!(matches!(err, AdapterError::NotFound { .. }));
}

#[tokio::test]
async fn scrape_adapter_unparseable_page_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/natgeo/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Log in</html>"))
        .mount(&server)
        .await;

    let adapter = PublicPageAdapter::with_base_url(Platform::Instagram, http(), &server.uri());
    let err = adapter.fetch("natgeo").await.unwrap_err();

    assert!(matches!(err, AdapterError::Transient { .. }));
}

#[tokio::test]
async fn scrape_adapter_server_error_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/natgeo/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let adapter = PublicPageAdapter::with_base_url(Platform::Instagram, http(), &server.uri());
    let err = adapter.fetch("natgeo").await.unwrap_err();

    assert!(matches!(err, AdapterError::Transient { .. }));
}
