//! Client and polling state machine for asynchronous scraping job services.
//!
//! A job service exposes `submit(input) -> job`, `status(job) -> {status,
//! result handle}` and `results(handle) -> records`. [`JobServiceClient`]
//! speaks that protocol over HTTP; [`poll_job`] and [`run_job`] drive it to
//! completion within a local time budget.

pub mod backend;
pub mod client;
pub mod error;
pub mod poll;
pub mod types;

pub use backend::JobBackend;
pub use client::JobServiceClient;
pub use error::JobError;
pub use poll::{poll_job, run_job, JobRunError, PollConfig, PollOutcome};
pub use types::{Job, JobStatus};
