use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use cprof_core::{PayloadSchema, Platform};
use cprof_resolver::{AdapterError, ProfileAdapter, RawPayload};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;

/// Answers found for `known`, not-found for `ghost`, and a transient failure
/// for anything else.
struct FixtureAdapter;

#[async_trait]
impl ProfileAdapter for FixtureAdapter {
    fn id(&self) -> &str {
        "fixture"
    }

    async fn fetch(&self, handle: &str) -> Result<RawPayload, AdapterError> {
        match handle {
            "known" => Ok(RawPayload::new(
                PayloadSchema::ScrapedPage,
                json!({
                    "username": "known",
                    "followerCount": 2000,
                    "postCount": 4,
                    "totalLikes": 400
                }),
            )),
            "ghost" => Err(AdapterError::NotFound {
                provider: "fixture".to_string(),
                handle: handle.to_string(),
            }),
            _ => Err(AdapterError::Transient {
                provider: "fixture".to_string(),
                message: "upstream down".to_string(),
            }),
        }
    }
}

fn app_with_limit(max_requests: usize) -> Router {
    let resolver = ProfileResolver::builder()
        .adapter(Platform::Instagram, Arc::new(FixtureAdapter))
        .build();
    build_app(
        AppState {
            resolver: Arc::new(resolver),
        },
        RateLimitState::new(max_requests, Duration::from_secs(60)),
    )
}

fn app() -> Router {
    app_with_limit(100)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json parse"))
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = get_json(app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn resolves_known_profile() {
    let (status, json) = get_json(app(), "/api/v1/profiles/instagram/@known").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["username"], "known");
    assert_eq!(json["data"]["followerCount"], 2000);
    assert_eq!(json["data"]["engagementRate"], 5.0);
    assert_eq!(json["data"]["isSynthetic"], false);
    assert_eq!(json["data"]["sourceProvider"], "fixture");
}

#[tokio::test]
async fn upstream_not_found_maps_to_404() {
    let (status, json) = get_json(app(), "/api/v1/profiles/instagram/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn failing_upstreams_still_answer_with_synthetic_profile() {
    let (status, json) = get_json(app(), "/api/v1/profiles/instagram/flaky").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["isSynthetic"], true);
    assert_eq!(json["data"]["sourceProvider"], "synthetic");
}

#[tokio::test]
async fn unknown_platform_is_bad_request() {
    let (status, json) = get_json(app(), "/api/v1/profiles/myspace/known").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn blank_handle_is_bad_request() {
    let (status, _) = get_json(app(), "/api/v1/profiles/instagram/%40").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
}

#[tokio::test]
async fn profile_route_is_rate_limited() {
    let app = app_with_limit(1);

    let (first, _) = get_json(app.clone(), "/api/v1/profiles/instagram/known").await;
    let (second, json) = get_json(app, "/api/v1/profiles/instagram/known").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");
}

#[test]
fn api_error_codes_map_to_statuses() {
    assert_eq!(
        ApiError::new("r", "not_found", "x").into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ApiError::new("r", "bad_request", "x").into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError::new("r", "boom", "x").into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
