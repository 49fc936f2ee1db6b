//! Polling state machine for submitted jobs.
//!
//! A poll ends in exactly one of three outcomes: the job succeeded, the job
//! reached a terminal failure state, or the local wait budget ran out. Errors
//! while *asking* about the job are transient and never end the poll on
//! their own; only the budget does.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;

use crate::backend::JobBackend;
use crate::error::JobError;
use crate::types::{Job, JobStatus};

/// Interval and wall-clock budget for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    #[must_use]
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from_millis(3_000, 90_000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded(Job),
    /// The job ended `FAILED`, `TIMED_OUT` or `ABORTED` remotely.
    TerminalFailure(Job),
    /// The local budget ran out. The remote job is left running.
    TimedOut {
        elapsed: Duration,
        last_status: JobStatus,
    },
}

/// Polls `job` until it succeeds, fails terminally, or `config.timeout`
/// elapses.
///
/// The first status check happens immediately; later checks are spaced by
/// `config.interval`, with the last sleep clipped to the remaining budget.
/// Each status call is itself cut off when the budget runs out, so a stalled
/// backend cannot stretch the wait.
pub async fn poll_job<B>(backend: &B, job: &Job, config: PollConfig) -> PollOutcome
where
    B: JobBackend + ?Sized,
{
    let started = Instant::now();
    let mut last_status = job.status;

    loop {
        let remaining = config.timeout.saturating_sub(started.elapsed());
        let Ok(checked) = tokio::time::timeout(remaining, backend.status(&job.id)).await else {
            tracing::warn!(job_id = %job.id, "status call still pending when the budget ran out");
            return PollOutcome::TimedOut {
                elapsed: started.elapsed(),
                last_status,
            };
        };

        match checked {
            Ok(current) if current.status == JobStatus::Succeeded => {
                return PollOutcome::Succeeded(current);
            }
            Ok(current) if current.status.is_terminal_failure() => {
                return PollOutcome::TerminalFailure(current);
            }
            Ok(current) => {
                tracing::debug!(
                    job_id = %job.id,
                    status = %current.status,
                    "job still in progress"
                );
                last_status = current.status;
            }
            Err(e) => {
                tracing::warn!(
                    job_id = %job.id,
                    error = %e,
                    "transient error checking job status; continuing to poll"
                );
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            return PollOutcome::TimedOut {
                elapsed,
                last_status,
            };
        }

        let remaining = config.timeout - elapsed;
        tokio::time::sleep(config.interval.min(remaining)).await;
    }
}

/// Failure modes of [`run_job`].
#[derive(Debug, Error)]
pub enum JobRunError {
    /// Submission was rejected; no polling happened.
    #[error("job submission failed: {0}")]
    Submit(#[source] JobError),

    #[error("job {job_id} ended with status {status}")]
    Terminal { job_id: String, status: JobStatus },

    #[error("job {job_id} still {last_status} after {}ms", .elapsed.as_millis())]
    TimedOut {
        job_id: String,
        elapsed: Duration,
        last_status: JobStatus,
    },

    /// The job succeeded but its result dataset could not be fetched.
    #[error("fetching results of job {job_id} failed: {source}")]
    Results {
        job_id: String,
        #[source]
        source: JobError,
    },
}

/// Submits a job, polls it to completion and returns its result records.
///
/// `config.timeout` covers the wait for the remote job only. The submit and
/// results calls are single requests bounded by the backend's own request
/// timeout.
///
/// # Errors
///
/// Returns a [`JobRunError`] describing which stage of the protocol failed.
pub async fn run_job<B>(
    backend: &B,
    actor_id: &str,
    input: &Value,
    config: PollConfig,
) -> Result<Vec<Value>, JobRunError>
where
    B: JobBackend + ?Sized,
{
    let job = backend
        .submit(actor_id, input)
        .await
        .map_err(JobRunError::Submit)?;
    tracing::info!(actor_id, job_id = %job.id, "job submitted, polling for completion");

    match poll_job(backend, &job, config).await {
        PollOutcome::Succeeded(done) => {
            tracing::info!(
                job_id = %done.id,
                result_handle = %done.result_handle,
                "job succeeded, fetching results"
            );
            backend
                .results(&done.result_handle)
                .await
                .map_err(|source| JobRunError::Results {
                    job_id: done.id.clone(),
                    source,
                })
        }
        PollOutcome::TerminalFailure(failed) => Err(JobRunError::Terminal {
            job_id: failed.id,
            status: failed.status,
        }),
        PollOutcome::TimedOut {
            elapsed,
            last_status,
        } => Err(JobRunError::TimedOut {
            job_id: job.id,
            elapsed,
            last_status,
        }),
    }
}
