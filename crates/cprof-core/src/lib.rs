//! Shared domain types and configuration for the creator-profile pipeline.

pub mod app_config;
pub mod config;
pub mod error;
pub mod platform;
pub mod profile;
pub mod providers;

pub use app_config::{AppConfig, Environment, OfficialApiCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use platform::{normalize_handle, Platform};
pub use profile::{Profile, SYNTHETIC_PROVIDER};
pub use providers::{
    load_providers, parse_providers, JobInputKind, JobServiceConfig, PayloadSchema, ProvidersFile,
};
