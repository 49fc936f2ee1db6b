use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A social platform the pipeline can resolve creator profiles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::TikTok, Platform::YouTube];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Path segments that introduce the real identifier on some profile URLs
/// (`youtube.com/c/<name>`, `youtube.com/channel/<id>`, ...).
const URL_PREFIX_SEGMENTS: &[&str] = &["c", "user", "channel"];

/// Reduces a free-form handle to a bare username.
///
/// Accepts a bare username, an `@handle`, or a full profile URL with or
/// without scheme. Query strings, fragments and trailing slashes are dropped.
///
/// # Errors
///
/// Returns [`CoreError::InvalidHandle`] if nothing usable remains.
pub fn normalize_handle(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();

    let candidate = if looks_like_url(trimmed) {
        handle_from_url(trimmed)
    } else {
        trimmed
    };

    let username = candidate.trim_start_matches('@').trim();
    if username.is_empty() {
        return Err(CoreError::InvalidHandle(raw.to_string()));
    }

    Ok(username.to_string())
}

fn looks_like_url(s: &str) -> bool {
    s.contains("://") || s.starts_with("www.") || s.contains(".com/")
}

fn handle_from_url(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split_once('/')
        .map_or("", |(_, path)| path);
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match segments.next() {
        Some(first) if URL_PREFIX_SEGMENTS.contains(&first) => segments.next().unwrap_or_default(),
        Some(first) => first,
        None => "",
    }
}
