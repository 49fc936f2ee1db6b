//! Data-source adapters.
//!
//! Each adapter makes a single attempt against one upstream and hands back
//! the raw payload; normalization and fallback are the resolver's job.

mod job;
mod official;
mod scrape;

use std::time::Duration;

use async_trait::async_trait;
use cprof_core::Platform;
use reqwest::Client;

use crate::error::AdapterError;
use crate::payload::RawPayload;

pub use job::JobPollingAdapter;
pub use official::OfficialApiAdapter;
pub use scrape::PublicPageAdapter;

/// One strategy for obtaining raw profile data.
#[async_trait]
pub trait ProfileAdapter: Send + Sync {
    /// Stable provider id, stamped on the profiles this adapter produces.
    fn id(&self) -> &str;

    /// `false` when the adapter lacks the credentials it needs and would
    /// report [`AdapterError::Unavailable`] without touching the network.
    fn is_available(&self) -> bool {
        true
    }

    /// Fetches the raw payload for an already-normalized `handle`.
    async fn fetch(&self, handle: &str) -> Result<RawPayload, AdapterError>;
}

/// Public profile URL of `handle` on `platform`.
#[must_use]
pub fn profile_url(platform: Platform, handle: &str) -> String {
    format!("{}{}", platform_origin(platform), profile_path(platform, handle))
}

pub(crate) fn platform_origin(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "https://www.instagram.com",
        Platform::TikTok => "https://www.tiktok.com",
        Platform::YouTube => "https://www.youtube.com",
    }
}

pub(crate) fn profile_path(platform: Platform, handle: &str) -> String {
    match platform {
        Platform::Instagram => format!("/{handle}/"),
        Platform::TikTok | Platform::YouTube => format!("/@{handle}"),
    }
}

/// Builds the HTTP client shared by the direct-fetch adapters.
///
/// # Errors
///
/// Returns `reqwest::Error` if the client cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()
}
