use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Credential pair for an authenticated official platform API.
#[derive(Clone)]
pub struct OfficialApiCredentials {
    pub client_key: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OfficialApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficialApiCredentials")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Optional YAML file overriding the built-in job-service list.
    pub providers_path: Option<PathBuf>,
    /// `None` unless both halves of the pair are set.
    pub tiktok_credentials: Option<OfficialApiCredentials>,
    pub job_service_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("providers_path", &self.providers_path)
            .field("tiktok_credentials", &self.tiktok_credentials)
            .field(
                "job_service_token",
                &self.job_service_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
