use async_trait::async_trait;
use serde_json::Value;

use crate::error::JobError;
use crate::types::Job;

/// The submit / status / result protocol of an asynchronous job service.
///
/// [`crate::JobServiceClient`] is the HTTP implementation; the polling state
/// machine only depends on this trait.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Starts a job for `actor_id` with the given input document.
    async fn submit(&self, actor_id: &str, input: &Value) -> Result<Job, JobError>;

    /// Reads the current state of a previously submitted job.
    async fn status(&self, job_id: &str) -> Result<Job, JobError>;

    /// Fetches the records stored under a succeeded job's result handle.
    async fn results(&self, result_handle: &str) -> Result<Vec<Value>, JobError>;
}
