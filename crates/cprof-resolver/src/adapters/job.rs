//! Adapter over an asynchronous scraping job (submit, poll, fetch dataset).

use std::sync::Arc;

use async_trait::async_trait;
use cprof_core::{JobInputKind, JobServiceConfig};
use cprof_jobs::{run_job, JobBackend, JobRunError, PollConfig};
use serde_json::{json, Value};

use super::{profile_url, ProfileAdapter};
use crate::error::AdapterError;
use crate::payload::RawPayload;

/// One configured job service. Without a backend (no token configured) every
/// fetch reports [`AdapterError::Unavailable`].
pub struct JobPollingAdapter {
    service: JobServiceConfig,
    backend: Option<Arc<dyn JobBackend>>,
}

impl JobPollingAdapter {
    #[must_use]
    pub fn new(service: JobServiceConfig, backend: Option<Arc<dyn JobBackend>>) -> Self {
        Self { service, backend }
    }

    /// Input document for one handle, shaped by the service's input kind.
    fn input(&self, handle: &str) -> Value {
        let limit = self.service.results_limit;
        match self.service.input {
            JobInputKind::Profiles => json!({
                "profiles": [handle],
                "resultsPerPage": limit,
            }),
            JobInputKind::Usernames => json!({
                "usernames": [handle],
                "resultsLimit": limit,
            }),
            JobInputKind::DirectUrls => json!({
                "directUrls": [profile_url(self.service.platform, handle)],
                "resultsLimit": limit,
            }),
        }
    }

    fn poll_config(&self) -> PollConfig {
        PollConfig::from_millis(self.service.poll_interval_ms, self.service.timeout_ms)
    }

    fn map_run_error(&self, err: JobRunError) -> AdapterError {
        let provider = self.service.name.clone();
        match err {
            JobRunError::Terminal { job_id, status } => AdapterError::JobTerminalFailure {
                provider,
                job_id,
                status,
            },
            JobRunError::TimedOut { elapsed, .. } => AdapterError::LocalTimeout {
                provider,
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            },
            JobRunError::Submit(_) | JobRunError::Results { .. } => AdapterError::Transient {
                provider,
                message: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl ProfileAdapter for JobPollingAdapter {
    fn id(&self) -> &str {
        &self.service.name
    }

    fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    async fn fetch(&self, handle: &str) -> Result<RawPayload, AdapterError> {
        let Some(backend) = &self.backend else {
            return Err(AdapterError::Unavailable {
                provider: self.service.name.clone(),
            });
        };

        let items = run_job(
            backend.as_ref(),
            &self.service.actor_id,
            &self.input(handle),
            self.poll_config(),
        )
        .await
        .map_err(|e| self.map_run_error(e))?;

        let Some(first) = items.into_iter().next() else {
            return Err(AdapterError::EmptyResult {
                provider: self.service.name.clone(),
            });
        };

        Ok(RawPayload::new(self.service.schema, first))
    }
}
