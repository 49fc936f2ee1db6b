use cprof_core::PayloadSchema;
use serde_json::json;

use super::*;

fn payload(schema: PayloadSchema, body: Value) -> RawPayload {
    RawPayload::new(schema, body)
}

// -----------------------------------------------------------------------
// field resolution
// -----------------------------------------------------------------------

#[test]
fn flat_tiktok_job_record_uses_aggregate_engagement() {
    let raw = payload(
        PayloadSchema::TiktokProfileJob,
        json!({"followerCount": 1200, "heartCount": 3600, "videoCount": 30}),
    );

    let profile =
        normalize(Platform::TikTok, &raw, "tiktok-profile-scraper", "sample_user").unwrap();

    assert_eq!(profile.username, "sample_user");
    assert_eq!(profile.display_name, "sample_user");
    assert_eq!(profile.follower_count, 1200);
    assert_eq!(profile.post_count, 30);
    assert!((profile.engagement_rate - 10.0).abs() < f64::EPSILON);
    assert!(!profile.is_synthetic);
    assert_eq!(profile.source_provider, "tiktok-profile-scraper");
}

#[test]
fn nested_author_meta_paths_resolve() {
    let raw = payload(
        PayloadSchema::TiktokProfileJob,
        json!({
            "authorMeta": {
                "name": "@dancer",
                "nickName": "The Dancer",
                "signature": "moves",
                "fans": "1.2K",
                "following": 80,
                "video": 12,
                "verified": true,
                "avatar": "https://cdn.example/a.jpg"
            }
        }),
    );

    let profile = normalize(Platform::TikTok, &raw, "p", "ignored").unwrap();

    assert_eq!(profile.username, "dancer");
    assert_eq!(profile.display_name, "The Dancer");
    assert_eq!(profile.biography, "moves");
    assert_eq!(profile.follower_count, 1_200);
    assert_eq!(profile.following_count, 80);
    assert_eq!(profile.post_count, 12);
    assert!(profile.is_verified);
    assert_eq!(profile.avatar_url, "https://cdn.example/a.jpg");
}

#[test]
fn earlier_candidate_key_wins() {
    let raw = payload(
        PayloadSchema::InstagramJob,
        json!({"followersCount": 500, "followers": 9, "edge_followed_by": {"count": 7}}),
    );
    let profile = normalize(Platform::Instagram, &raw, "p", "u").unwrap();
    assert_eq!(profile.follower_count, 500);
}

#[test]
fn null_candidate_falls_through_to_next_key() {
    let raw = payload(
        PayloadSchema::InstagramJob,
        json!({"followersCount": null, "edge_followed_by": {"count": "2,345"}}),
    );
    let profile = normalize(Platform::Instagram, &raw, "p", "u").unwrap();
    assert_eq!(profile.follower_count, 2_345);
}

#[test]
fn official_api_envelope_is_read_through_data() {
    let raw = payload(
        PayloadSchema::TiktokOfficial,
        json!({
            "data": {
                "display_name": "Official",
                "bio_description": "hi",
                "is_verified": false,
                "follower_count": 2000,
                "following_count": 3,
                "likes_count": 5000,
                "video_count": 50
            },
            "error": {"code": "ok", "message": ""}
        }),
    );

    let profile = normalize(Platform::TikTok, &raw, "tiktok-research-api", "official").unwrap();

    assert_eq!(profile.username, "official");
    assert_eq!(profile.display_name, "Official");
    assert_eq!(profile.follower_count, 2000);
    // 5000 likes over 50 videos = 100 per post; 100 / 2000 = 5%.
    assert!((profile.engagement_rate - 5.0).abs() < f64::EPSILON);
}

// -----------------------------------------------------------------------
// robustness
// -----------------------------------------------------------------------

#[test]
fn missing_optional_fields_default_to_zero_values() {
    let raw = payload(PayloadSchema::InstagramJob, json!({"username": "quiet"}));

    let profile = normalize(Platform::Instagram, &raw, "p", "fallback").unwrap();

    assert_eq!(profile.username, "quiet");
    assert_eq!(profile.display_name, "quiet");
    assert_eq!(profile.biography, "");
    assert_eq!(profile.follower_count, 0);
    assert_eq!(profile.following_count, 0);
    assert_eq!(profile.post_count, 0);
    assert!(!profile.is_verified);
    assert_eq!(profile.avatar_url, "");
    assert!(profile.engagement_rate.abs() < f64::EPSILON);
}

#[test]
fn zero_followers_means_zero_engagement() {
    let raw = payload(
        PayloadSchema::TiktokUserJob,
        json!({"stats": {"followerCount": 0, "heartCount": 900, "videoCount": 3}}),
    );
    let profile = normalize(Platform::TikTok, &raw, "p", "u").unwrap();
    assert!(profile.engagement_rate.abs() < f64::EPSILON);
}

#[test]
fn negative_counts_clamp_to_zero() {
    let raw = payload(PayloadSchema::ScrapedPage, json!({"followerCount": -10, "postCount": "-1"}));
    let profile = normalize(Platform::YouTube, &raw, "p", "u").unwrap();
    assert_eq!(profile.follower_count, 0);
    assert_eq!(profile.post_count, 0);
}

#[test]
fn non_object_body_is_rejected() {
    let raw = payload(PayloadSchema::TiktokUserJob, json!([1, 2, 3]));
    let err = normalize(Platform::TikTok, &raw, "p", "u").unwrap_err();
    assert_eq!(err.provider, "p");
    assert!(err.reason.contains("an array"));
}

#[test]
fn object_without_any_known_key_is_rejected() {
    let raw = payload(PayloadSchema::InstagramJob, json!({"unrelated": true}));
    assert!(normalize(Platform::Instagram, &raw, "p", "u").is_err());
}

// -----------------------------------------------------------------------
// engagement
// -----------------------------------------------------------------------

#[test]
fn post_sample_wins_over_aggregates() {
    let raw = payload(
        PayloadSchema::InstagramJob,
        json!({
            "followersCount": 1000,
            "postsCount": 10,
            "latestPosts": [
                {"likesCount": 30, "commentsCount": 5},
                {"likesCount": 10, "commentsCount": 5}
            ]
        }),
    );

    let profile = normalize(Platform::Instagram, &raw, "p", "u").unwrap();

    // (20 avg likes + 5 avg comments) / 1000 followers = 2.5%.
    assert!((profile.engagement_rate - 2.5).abs() < f64::EPSILON);
}

#[test]
fn empty_post_sample_falls_back_to_aggregates() {
    let raw = payload(
        PayloadSchema::TiktokUserJob,
        json!({
            "stats": {"followerCount": 3000, "heartCount": 1000, "videoCount": 10},
            "videos": []
        }),
    );
    let profile = normalize(Platform::TikTok, &raw, "p", "u").unwrap();
    // 100 per post / 3000 = 3.333..% -> 3.33
    assert!((profile.engagement_rate - 3.33).abs() < 1e-9);
}

#[test]
fn no_sample_and_no_totals_gives_zero_engagement() {
    let raw = payload(
        PayloadSchema::InstagramJob,
        json!({"followersCount": 1000, "postsCount": 4}),
    );
    let profile = normalize(Platform::Instagram, &raw, "p", "u").unwrap();
    assert!(profile.engagement_rate.abs() < f64::EPSILON);
}
