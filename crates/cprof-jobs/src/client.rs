//! HTTP client for the asynchronous scraping job service.
//!
//! Wraps `reqwest` with bearer-token auth, the `{"data": ...}` response
//! envelope, and typed errors. Speaks the actor-run REST shape:
//! `POST /acts/{actor}/runs`, `GET /actor-runs/{id}` and
//! `GET /datasets/{id}/items`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::JobBackend;
use crate::error::JobError;
use crate::types::{ApiResponse, Job, RunData};

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Client for the job service REST API.
///
/// Use [`JobServiceClient::new`] for production or
/// [`JobServiceClient::with_base_url`] to point at a mock server in tests.
pub struct JobServiceClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl JobServiceClient {
    /// Creates a new client pointed at the production job service.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, JobError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`JobError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(token: &str, timeout_secs: u64, base_url: &str) -> Result<Self, JobError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cprof/0.1 (creator-profiles)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| JobError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Starts a run of `actor_id` with `input` as its input document.
    ///
    /// # Errors
    ///
    /// - [`JobError::Api`] if the service rejects the submission (bad token,
    ///   unknown actor, malformed input).
    /// - [`JobError::Http`] on network failure.
    /// - [`JobError::Deserialize`] if the run metadata does not parse.
    pub async fn start_run(&self, actor_id: &str, input: &Value) -> Result<Job, JobError> {
        let url = self.endpoint(&format!("acts/{actor_id}/runs"))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let run: ApiResponse<RunData> =
            Self::read_json(response, &format!("start run of {actor_id}")).await?;
        Ok(run.data.into())
    }

    /// Reads the current state of a run. A single request, never retried.
    ///
    /// # Errors
    ///
    /// - [`JobError::Api`] on a non-2xx status.
    /// - [`JobError::Http`] on network failure.
    /// - [`JobError::Deserialize`] if the run metadata does not parse.
    pub async fn get_run(&self, run_id: &str) -> Result<Job, JobError> {
        let url = self.endpoint(&format!("actor-runs/{run_id}"))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let run: ApiResponse<RunData> =
            Self::read_json(response, &format!("run status of {run_id}")).await?;
        tracing::debug!(
            run_id,
            status = %run.data.status,
            started_at = ?run.data.started_at,
            finished_at = ?run.data.finished_at,
            "fetched run status"
        );
        Ok(run.data.into())
    }

    /// Fetches every item of a dataset as raw JSON records.
    ///
    /// # Errors
    ///
    /// - [`JobError::Api`] on a non-2xx status.
    /// - [`JobError::Http`] on network failure.
    /// - [`JobError::Deserialize`] if the body is not a JSON array.
    pub async fn get_dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, JobError> {
        let mut url = self.endpoint(&format!("datasets/{dataset_id}/items"))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("clean", "true");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::read_json(response, &format!("dataset items of {dataset_id}")).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, JobError> {
        self.base_url
            .join(path)
            .map_err(|e| JobError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Asserts a 2xx status and deserializes the body.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, JobError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| JobError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl JobBackend for JobServiceClient {
    async fn submit(&self, actor_id: &str, input: &Value) -> Result<Job, JobError> {
        self.start_run(actor_id, input).await
    }

    async fn status(&self, job_id: &str) -> Result<Job, JobError> {
        self.get_run(job_id).await
    }

    async fn results(&self, result_handle: &str) -> Result<Vec<Value>, JobError> {
        self.get_dataset_items(result_handle).await
    }
}
