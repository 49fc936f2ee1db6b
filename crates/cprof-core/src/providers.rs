//! Static job-service configuration.
//!
//! The provider chain order is fixed per platform; this file only controls
//! which asynchronous job services are appended to it and how each is polled.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Platform};

/// Shape of a raw provider payload. Selects the normalizer's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSchema {
    TiktokOfficial,
    TiktokProfileJob,
    TiktokUserJob,
    InstagramJob,
    ScrapedPage,
}

/// How the handle is embedded in a job's input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobInputKind {
    /// `{"profiles": ["<handle>"], "resultsPerPage": N}`
    Profiles,
    /// `{"usernames": ["<handle>"], "resultsLimit": N}`
    Usernames,
    /// `{"directUrls": ["<profile url>"], "resultsLimit": N}`
    DirectUrls,
}

fn default_results_limit() -> u32 {
    12
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_timeout_ms() -> u64 {
    90_000
}

/// One asynchronous job service (actor) tried by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobServiceConfig {
    pub name: String,
    pub platform: Platform,
    pub actor_id: String,
    pub input: JobInputKind,
    pub schema: PayloadSchema,
    #[serde(default = "default_results_limit")]
    pub results_limit: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersFile {
    #[serde(default)]
    pub job_services: Vec<JobServiceConfig>,
}

impl Default for ProvidersFile {
    fn default() -> Self {
        Self {
            job_services: vec![
                JobServiceConfig {
                    name: "tiktok-profile-scraper".to_string(),
                    platform: Platform::TikTok,
                    actor_id: "clockworks~tiktok-profile-scraper".to_string(),
                    input: JobInputKind::Profiles,
                    schema: PayloadSchema::TiktokProfileJob,
                    results_limit: 12,
                    poll_interval_ms: 3_000,
                    timeout_ms: 90_000,
                },
                JobServiceConfig {
                    name: "tiktok-user-scraper".to_string(),
                    platform: Platform::TikTok,
                    actor_id: "apidojo~tiktok-user-scraper".to_string(),
                    input: JobInputKind::Usernames,
                    schema: PayloadSchema::TiktokUserJob,
                    results_limit: 1,
                    poll_interval_ms: 3_000,
                    timeout_ms: 60_000,
                },
            ],
        }
    }
}

impl ProvidersFile {
    /// Job services for `platform`, in file order.
    pub fn for_platform(&self, platform: Platform) -> impl Iterator<Item = &JobServiceConfig> {
        self.job_services
            .iter()
            .filter(move |svc| svc.platform == platform)
    }
}

/// Load and validate the job-service configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_providers(&content)
}

/// Parse and validate a YAML provider document.
///
/// # Errors
///
/// Returns `ConfigError` if the document cannot be parsed or fails validation.
pub fn parse_providers(content: &str) -> Result<ProvidersFile, ConfigError> {
    let providers: ProvidersFile = serde_yaml::from_str(content)?;
    validate_providers(&providers)?;
    Ok(providers)
}

fn validate_providers(providers: &ProvidersFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for svc in &providers.job_services {
        if svc.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "job service name must be non-empty".to_string(),
            ));
        }

        if svc.actor_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "job service '{}' has an empty actor_id",
                svc.name
            )));
        }

        if svc.platform == Platform::YouTube {
            return Err(ConfigError::Validation(format!(
                "job service '{}' targets youtube, whose chain has no job stage",
                svc.name
            )));
        }

        if svc.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(format!(
                "job service '{}' must poll at a non-zero interval",
                svc.name
            )));
        }

        if svc.timeout_ms < svc.poll_interval_ms {
            return Err(ConfigError::Validation(format!(
                "job service '{}' has timeout_ms {} shorter than poll_interval_ms {}",
                svc.name, svc.timeout_ms, svc.poll_interval_ms
            )));
        }

        if !seen_names.insert(svc.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate job service name: '{}'",
                svc.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "providers_test.rs"]
mod tests;
