//! Maps provider payloads onto the canonical [`Profile`].
//!
//! Field names come from the schema's table in [`crate::fields`]; value
//! coercion lives in [`crate::parse`]. Missing optional fields never fail:
//! counts default to 0, text to empty, flags to `false`.

use cprof_core::{Platform, Profile};
use serde_json::Value;

use crate::error::NormalizationError;
use crate::fields::{table_for, FieldTable};
use crate::parse::{as_count, as_flag, as_text, first_defined, lookup};
use crate::payload::RawPayload;

/// Normalizes `payload` into a [`Profile`] attributed to `provider`.
///
/// `fallback_username` fills `username` when the payload does not carry one.
///
/// # Errors
///
/// Returns [`NormalizationError`] when the body is not a JSON object, or when
/// no path of the schema's field table resolves in it.
pub fn normalize(
    platform: Platform,
    payload: &RawPayload,
    provider: &str,
    fallback_username: &str,
) -> Result<Profile, NormalizationError> {
    let body = &payload.body;
    if !body.is_object() {
        return Err(NormalizationError {
            provider: provider.to_string(),
            reason: format!("expected a JSON object, got {}", json_kind(body)),
        });
    }

    let table = table_for(payload.schema);
    if !table.top_level_paths().any(|path| lookup(body, path).is_some()) {
        return Err(NormalizationError {
            provider: provider.to_string(),
            reason: format!("no known {:?} field present", payload.schema),
        });
    }

    let username = text(body, table.username)
        .map(|u| u.trim_start_matches('@').to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| fallback_username.to_string());
    let display_name = text(body, table.display_name)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| username.clone());

    let follower_count = count(body, table.follower_count).unwrap_or(0);
    let post_count = count(body, table.post_count).unwrap_or(0);
    let engagement_rate = engagement_rate(body, table, follower_count, post_count);

    Ok(Profile {
        platform,
        username,
        display_name,
        biography: text(body, table.biography).unwrap_or_default(),
        follower_count,
        following_count: count(body, table.following_count).unwrap_or(0),
        post_count,
        is_verified: first_defined(body, table.is_verified)
            .and_then(as_flag)
            .unwrap_or(false),
        avatar_url: text(body, table.avatar_url).unwrap_or_default(),
        engagement_rate,
        is_synthetic: false,
        source_provider: provider.to_string(),
    })
}

/// Engagement as a percentage of followers, rounded to two decimals.
///
/// A non-empty post sample wins over lifetime totals; lifetime totals are
/// spread over `post_count`. Zero followers or no usable data yields 0.
#[allow(clippy::cast_precision_loss)]
fn engagement_rate(body: &Value, table: &FieldTable, followers: u64, post_count: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }

    let per_post = sample_average(body, table).or_else(|| {
        let likes = count(body, table.total_likes);
        let comments = count(body, table.total_comments);
        if post_count == 0 || (likes.is_none() && comments.is_none()) {
            return None;
        }
        let total = likes.unwrap_or(0).saturating_add(comments.unwrap_or(0));
        Some(total as f64 / post_count as f64)
    });

    per_post.map_or(0.0, |avg| round2(100.0 * avg / followers as f64))
}

/// `avgLikes + avgComments` over the recent-post sample, if one is present.
#[allow(clippy::cast_precision_loss)]
fn sample_average(body: &Value, table: &FieldTable) -> Option<f64> {
    let posts = first_defined(body, table.recent_posts)?.as_array()?;
    if posts.is_empty() {
        return None;
    }

    let (likes, comments) = posts.iter().fold((0u64, 0u64), |(l, c), post| {
        (
            l.saturating_add(count(post, table.post_likes).unwrap_or(0)),
            c.saturating_add(count(post, table.post_comments).unwrap_or(0)),
        )
    });
    let n = posts.len() as f64;
    Some(likes as f64 / n + comments as f64 / n)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn count(body: &Value, paths: &[&str]) -> Option<u64> {
    paths
        .iter()
        .filter_map(|path| lookup(body, path))
        .find_map(as_count)
}

fn text(body: &Value, paths: &[&str]) -> Option<String> {
    first_defined(body, paths).and_then(as_text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
