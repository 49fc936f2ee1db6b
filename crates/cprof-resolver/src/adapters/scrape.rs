//! Best-effort public-page scrape.
//!
//! Two passes over the raw HTML:
//! 1. **Embedded JSON**: per-platform matchers against the JSON state blobs
//!    the page ships for client-side hydration.
//! 2. **Meta text**: if pass 1 found no follower count, the OpenGraph /
//!    `<meta name="description">` text (`"1,234 Followers, 56 Following, 78
//!    Posts"`) is scanned with looser matchers.
//!
//! A page yielding no follower count after both passes is treated as a
//! transient failure (login wall, layout change), not as a missing account.

use async_trait::async_trait;
use cprof_core::{PayloadSchema, Platform};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use super::{platform_origin, profile_path, ProfileAdapter};
use crate::error::AdapterError;
use crate::parse::parse_count;
use crate::payload::RawPayload;

#[derive(Clone, Copy)]
enum Capture {
    Count,
    Text,
    Flag,
}

/// Field of the scraped-page payload filled by a pattern's first capture group.
struct Matcher {
    field: &'static str,
    pattern: &'static str,
    capture: Capture,
}

const fn m(field: &'static str, pattern: &'static str, capture: Capture) -> Matcher {
    Matcher {
        field,
        pattern,
        capture,
    }
}

static INSTAGRAM_MATCHERS: &[Matcher] = &[
    m("followerCount", r#""edge_followed_by"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#, Capture::Count),
    m("followingCount", r#""edge_follow"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#, Capture::Count),
    m(
        "postCount",
        r#""edge_owner_to_timeline_media"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#,
        Capture::Count,
    ),
    m("displayName", r#""full_name"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
    m("biography", r#""biography"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
    m("isVerified", r#""is_verified"\s*:\s*(true|false)"#, Capture::Flag),
    m("avatarUrl", r#""profile_pic_url_hd"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
];

static TIKTOK_MATCHERS: &[Matcher] = &[
    m("followerCount", r#""followerCount"\s*:\s*(\d+)"#, Capture::Count),
    m("followingCount", r#""followingCount"\s*:\s*(\d+)"#, Capture::Count),
    m("postCount", r#""videoCount"\s*:\s*(\d+)"#, Capture::Count),
    m("totalLikes", r#""heartCount"\s*:\s*(\d+)"#, Capture::Count),
    m("displayName", r#""nickname"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
    m("biography", r#""signature"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
    m("isVerified", r#""verified"\s*:\s*(true|false)"#, Capture::Flag),
    m("avatarUrl", r#""avatarLarger"\s*:\s*"((?:[^"\\]|\\.)*)""#, Capture::Text),
];

static YOUTUBE_MATCHERS: &[Matcher] = &[
    m(
        "followerCount",
        r#"(?s)"subscriberCountText"\s*:\s*\{.{0,400}?"simpleText"\s*:\s*"([\d.,]+\s?[KMBkmb]?) subscribers""#,
        Capture::Count,
    ),
    m(
        "followerCount",
        r#""subscriberCountText"\s*:\s*"([\d.,]+\s?[KMBkmb]?) subscribers""#,
        Capture::Count,
    ),
    m(
        "postCount",
        r#""videosCountText"\s*:\s*\{\s*"runs"\s*:\s*\[\s*\{\s*"text"\s*:\s*"([\d.,]+\s?[KMBkmb]?)""#,
        Capture::Count,
    ),
    m(
        "displayName",
        r#""channelMetadataRenderer"\s*:\s*\{\s*"title"\s*:\s*"((?:[^"\\]|\\.)*)""#,
        Capture::Text,
    ),
    m(
        "biography",
        r#""channelMetadataRenderer"\s*:\s*\{[^}]*?"description"\s*:\s*"((?:[^"\\]|\\.)*)""#,
        Capture::Text,
    ),
    m(
        "avatarUrl",
        r#""avatar"\s*:\s*\{\s*"thumbnails"\s*:\s*\[\s*\{\s*"url"\s*:\s*"((?:[^"\\]|\\.)*)""#,
        Capture::Text,
    ),
];

/// `<meta>` tags consulted by the second pass, by attribute value.
static META_MATCHERS: &[Matcher] = &[
    m(
        "metaDescription",
        r#"(?is)<meta[^>]+(?:name|property)\s*=\s*["'](?:og:)?description["'][^>]*content\s*=\s*"([^"]*)""#,
        Capture::Text,
    ),
    m(
        "displayName",
        r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*content\s*=\s*"([^"]*)""#,
        Capture::Text,
    ),
    m(
        "avatarUrl",
        r#"(?is)<meta[^>]+property\s*=\s*["']og:image["'][^>]*content\s*=\s*"([^"]*)""#,
        Capture::Text,
    ),
];

/// `<count> <label>` pairs inside meta description text.
const META_COUNT_PATTERN: &str =
    r"(?i)(\d[\d.,]*\s?[kmb]?)\s+(followers|subscribers|following|posts|videos|likes)\b";

struct Compiled {
    field: &'static str,
    regex: Regex,
    capture: Capture,
}

fn compile(matchers: &[Matcher]) -> Vec<Compiled> {
    matchers
        .iter()
        .map(|matcher| Compiled {
            field: matcher.field,
            regex: Regex::new(matcher.pattern).expect("valid scrape regex"),
            capture: matcher.capture,
        })
        .collect()
}

/// Unauthenticated GET of a public profile page, parsed with regex matchers.
pub struct PublicPageAdapter {
    platform: Platform,
    id: String,
    client: Client,
    origin: String,
    primary: Vec<Compiled>,
    meta: Vec<Compiled>,
    meta_counts: Regex,
}

impl PublicPageAdapter {
    #[must_use]
    pub fn new(platform: Platform, client: Client) -> Self {
        Self::with_base_url(platform, client, platform_origin(platform))
    }

    /// Scrapes pages under `base_url` instead of the platform origin (for testing).
    #[must_use]
    pub fn with_base_url(platform: Platform, client: Client, base_url: &str) -> Self {
        let matchers = match platform {
            Platform::Instagram => INSTAGRAM_MATCHERS,
            Platform::TikTok => TIKTOK_MATCHERS,
            Platform::YouTube => YOUTUBE_MATCHERS,
        };
        Self {
            platform,
            id: format!("{platform}-public-page"),
            client,
            origin: base_url.trim_end_matches('/').to_string(),
            primary: compile(matchers),
            meta: compile(META_MATCHERS),
            meta_counts: Regex::new(META_COUNT_PATTERN).expect("valid meta count regex"),
        }
    }

    /// Runs both extraction passes. Returns `None` when no follower count
    /// could be recovered.
    fn extract(&self, html: &str, handle: &str) -> Option<Map<String, Value>> {
        let mut fields = Map::new();
        fields.insert("username".to_string(), Value::String(handle.to_string()));

        apply(&self.primary, html, &mut fields);
        if !fields.contains_key("followerCount") {
            tracing::debug!(
                provider = %self.id,
                handle,
                "no embedded follower count, trying meta tags"
            );
            self.apply_meta(html, &mut fields);
        }

        fields.contains_key("followerCount").then_some(fields)
    }

    fn apply_meta(&self, html: &str, fields: &mut Map<String, Value>) {
        let mut meta = Map::new();
        apply(&self.meta, html, &mut meta);

        if let Some(Value::String(description)) = meta.remove("metaDescription") {
            let description = decode_entities(&description);
            for caps in self.meta_counts.captures_iter(&description) {
                let field = match caps[2].to_ascii_lowercase().as_str() {
                    "followers" | "subscribers" => "followerCount",
                    "following" => "followingCount",
                    "posts" | "videos" => "postCount",
                    _ => "totalLikes",
                };
                if let Some(n) = parse_count(&caps[1]) {
                    fields.entry(field).or_insert(Value::from(n));
                }
            }
        }

        for (field, value) in meta {
            if let Value::String(s) = value {
                fields
                    .entry(field)
                    .or_insert(Value::String(decode_entities(&s)));
            }
        }
    }
}

/// Fills `fields` from the first match of each matcher; fields already set
/// are kept.
fn apply(matchers: &[Compiled], text: &str, fields: &mut Map<String, Value>) {
    for matcher in matchers {
        if fields.contains_key(matcher.field) {
            continue;
        }
        let Some(raw) = matcher
            .regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };

        let value = match matcher.capture {
            Capture::Count => parse_count(raw).map(Value::from),
            Capture::Text => Some(Value::String(unescape_json(raw))),
            Capture::Flag => Some(Value::Bool(raw == "true")),
        };
        if let Some(value) = value {
            fields.insert(matcher.field.to_string(), value);
        }
    }
}

/// Decodes a captured JSON string body (`\"`, `@`, `\/`).
fn unescape_json(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#064;", "@")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[async_trait]
impl ProfileAdapter for PublicPageAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, handle: &str) -> Result<RawPayload, AdapterError> {
        let url = format!("{}{}", self.origin, profile_path(self.platform, handle));
        let response = self
            .client
            .get(&url)
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| AdapterError::transient(&self.id, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AdapterError::NotFound {
                provider: self.id.clone(),
                handle: handle.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AdapterError::transient(
                &self.id,
                format!("unexpected HTTP status {status} from {url}"),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AdapterError::transient(&self.id, e.to_string()))?;

        let fields = self.extract(&html, handle).ok_or_else(|| {
            AdapterError::transient(&self.id, format!("no follower count found on {url}"))
        })?;

        tracing::debug!(provider = %self.id, handle, fields = fields.len(), "scraped public page");
        Ok(RawPayload::new(PayloadSchema::ScrapedPage, Value::Object(fields)))
    }
}
