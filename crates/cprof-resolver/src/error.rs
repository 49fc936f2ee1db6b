use cprof_core::{CoreError, Platform};
use cprof_jobs::JobStatus;
use serde::Serialize;
use thiserror::Error;

/// The payload carried nothing the normalizer could read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot normalize payload from {provider}: {reason}")]
pub struct NormalizationError {
    pub provider: String,
    pub reason: String,
}

/// Failure of a single adapter attempt.
///
/// Only [`AdapterError::NotFound`] stops the provider chain. Every other
/// variant makes the resolver move on to the next adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Missing credentials or token; the adapter made no network call.
    #[error("{provider} is not configured")]
    Unavailable { provider: String },

    #[error("{provider} reports no profile for '{handle}'")]
    NotFound { provider: String, handle: String },

    /// Network failure, non-404 error status, or an unparseable response.
    #[error("{provider} fetch failed: {message}")]
    Transient { provider: String, message: String },

    #[error("{provider} job {job_id} ended with status {status}")]
    JobTerminalFailure {
        provider: String,
        job_id: String,
        status: JobStatus,
    },

    #[error("{provider} gave up waiting after {elapsed_ms}ms")]
    LocalTimeout { provider: String, elapsed_ms: u64 },

    #[error("{provider} job succeeded with an empty result set")]
    EmptyResult { provider: String },

    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

/// Coarse classification of an [`AdapterError`], used in attempt reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unavailable,
    NotFound,
    Transient,
    JobTerminalFailure,
    LocalTimeout,
    EmptyResult,
    Normalization,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Unavailable => "unavailable",
            FailureKind::NotFound => "not_found",
            FailureKind::Transient => "transient",
            FailureKind::JobTerminalFailure => "job_terminal_failure",
            FailureKind::LocalTimeout => "local_timeout",
            FailureKind::EmptyResult => "empty_result",
            FailureKind::Normalization => "normalization",
        };
        f.write_str(s)
    }
}

impl AdapterError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            AdapterError::Unavailable { .. } => FailureKind::Unavailable,
            AdapterError::NotFound { .. } => FailureKind::NotFound,
            AdapterError::Transient { .. } => FailureKind::Transient,
            AdapterError::JobTerminalFailure { .. } => FailureKind::JobTerminalFailure,
            AdapterError::LocalTimeout { .. } => FailureKind::LocalTimeout,
            AdapterError::EmptyResult { .. } => FailureKind::EmptyResult,
            AdapterError::Normalization(_) => FailureKind::Normalization,
        }
    }

    pub(crate) fn transient(provider: &str, message: impl Into<String>) -> Self {
        AdapterError::Transient {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// An upstream authoritatively reported the account does not exist.
    #[error("no {platform} profile '{username}' (reported by {provider})")]
    NotFound {
        platform: Platform,
        username: String,
        provider: String,
    },

    #[error(transparent)]
    InvalidHandle(#[from] CoreError),
}

/// Failure wiring adapters from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to build job service client: {0}")]
    Jobs(#[from] cprof_jobs::JobError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_error_converts_and_classifies() {
        let err: AdapterError = NormalizationError {
            provider: "p".to_string(),
            reason: "not an object".to_string(),
        }
        .into();
        assert_eq!(err.kind(), FailureKind::Normalization);
        assert_eq!(err.to_string(), "cannot normalize payload from p: not an object");
    }

    #[test]
    fn terminal_failure_message_names_status() {
        let err = AdapterError::JobTerminalFailure {
            provider: "tiktok-profile-scraper".to_string(),
            job_id: "run-1".to_string(),
            status: JobStatus::Aborted,
        };
        assert_eq!(err.kind(), FailureKind::JobTerminalFailure);
        assert!(err.to_string().contains("ABORTED"));
    }
}
