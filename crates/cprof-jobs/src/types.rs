use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle state of a remote job.
///
/// The remote service uses a richer vocabulary (`READY`, `TIMING-OUT`,
/// `ABORTING`, ...); transitional states fold into [`JobStatus::Running`] and
/// anything unrecognised is treated as still running so the local timeout
/// bounds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Submitted,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
}

impl JobStatus {
    /// `true` for the three failure states after which polling is pointless.
    #[must_use]
    pub fn is_terminal_failure(self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::TimedOut | JobStatus::Aborted
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == JobStatus::Succeeded || self.is_terminal_failure()
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "READY" | "SUBMITTED" => JobStatus::Submitted,
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            "TIMED-OUT" => JobStatus::TimedOut,
            "ABORTED" => JobStatus::Aborted,
            _ => JobStatus::Running,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::from(raw.as_str())
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::TimedOut => "TIMED_OUT",
            JobStatus::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// A submitted job as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Dataset id holding the results once the job has succeeded.
    pub result_handle: String,
}

/// Envelope wrapping every job-service response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
}

/// Actor-run metadata as returned by the job service.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunData {
    pub id: String,
    pub status: JobStatus,
    #[serde(rename = "defaultDatasetId", default)]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<RunData> for Job {
    fn from(run: RunData) -> Self {
        Job {
            id: run.id,
            status: run.status,
            result_handle: run.default_dataset_id,
        }
    }
}
