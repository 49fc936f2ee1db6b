//! TikTok Research API adapter.
//!
//! Two requests per fetch: a client-credentials token exchange, then the
//! `user/info` query. Tokens are not cached between fetches.

use async_trait::async_trait;
use cprof_core::{OfficialApiCredentials, PayloadSchema};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ProfileAdapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;

const PROVIDER_ID: &str = "tiktok-research-api";
const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com";
const USER_INFO_FIELDS: &str = "display_name,bio_description,avatar_url,is_verified,\
                                follower_count,following_count,likes_count,video_count";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub struct OfficialApiAdapter {
    client: Client,
    credentials: Option<OfficialApiCredentials>,
    base_url: String,
}

impl OfficialApiAdapter {
    #[must_use]
    pub fn new(client: Client, credentials: Option<OfficialApiCredentials>) -> Self {
        Self::with_base_url(client, credentials, DEFAULT_BASE_URL)
    }

    /// Points the adapter at a different API origin (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(
        client: Client,
        credentials: Option<OfficialApiCredentials>,
        base_url: &str,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn access_token(
        &self,
        credentials: &OfficialApiCredentials,
    ) -> Result<String, AdapterError> {
        let response = self
            .client
            .post(format!("{}/v2/oauth/token/", self.base_url))
            .form(&[
                ("client_key", credentials.client_key.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| AdapterError::transient(PROVIDER_ID, e.to_string()))?;

        let status = response.status();
        let token: TokenResponse = response.json().await.map_err(|e| {
            AdapterError::transient(PROVIDER_ID, format!("token response (HTTP {status}): {e}"))
        })?;

        match token.access_token {
            Some(access_token) if status.is_success() => Ok(access_token),
            _ => Err(AdapterError::transient(
                PROVIDER_ID,
                format!(
                    "token exchange rejected (HTTP {status}): {} {}",
                    token.error.unwrap_or_default(),
                    token.error_description.unwrap_or_default()
                )
                .trim_end()
                .to_string(),
            )),
        }
    }
}

#[async_trait]
impl ProfileAdapter for OfficialApiAdapter {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch(&self, handle: &str) -> Result<RawPayload, AdapterError> {
        let Some(credentials) = &self.credentials else {
            return Err(AdapterError::Unavailable {
                provider: PROVIDER_ID.to_string(),
            });
        };

        let token = self.access_token(credentials).await?;

        let response = self
            .client
            .post(format!("{}/v2/research/user/info/", self.base_url))
            .query(&[("fields", USER_INFO_FIELDS)])
            .bearer_auth(token)
            .json(&json!({ "username": handle }))
            .send()
            .await
            .map_err(|e| AdapterError::transient(PROVIDER_ID, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AdapterError::NotFound {
                provider: PROVIDER_ID.to_string(),
                handle: handle.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AdapterError::transient(
                PROVIDER_ID,
                format!("unexpected HTTP status {status}"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::transient(PROVIDER_ID, format!("user info body: {e}")))?;

        // The API reports failures inside a 200 envelope as well.
        let code = body
            .pointer("/error/code")
            .and_then(Value::as_str)
            .unwrap_or("ok");
        if code != "ok" {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(AdapterError::transient(
                PROVIDER_ID,
                format!("API error {code}: {message}"),
            ));
        }

        tracing::debug!(provider = PROVIDER_ID, handle, "fetched official user info");
        Ok(RawPayload::new(PayloadSchema::TiktokOfficial, body))
    }
}
