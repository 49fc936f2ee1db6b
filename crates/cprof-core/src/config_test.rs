use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CPROF_ENV"));
}

#[test]
fn empty_env_yields_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(config.env, Environment::Development);
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.request_timeout_secs, 20);
    assert!(config.user_agent.starts_with("Mozilla/5.0"));
    assert!(config.providers_path.is_none());
    assert!(config.tiktok_credentials.is_none());
    assert!(config.job_service_token.is_none());
}

#[test]
fn credential_pair_requires_both_halves() {
    let mut map = HashMap::new();
    map.insert("TIKTOK_CLIENT_KEY", "key-only");
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(config.tiktok_credentials.is_none());

    map.insert("TIKTOK_CLIENT_SECRET", "secret");
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    let creds = config.tiktok_credentials.expect("pair should be configured");
    assert_eq!(creds.client_key, "key-only");
    assert_eq!(creds.client_secret, "secret");
}

#[test]
fn blank_token_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("APIFY_TOKEN", "   ");
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(config.job_service_token.is_none());
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CPROF_BIND_ADDR", "not-an-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CPROF_BIND_ADDR"
        ),
        "expected InvalidEnvVar(CPROF_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn zero_request_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CPROF_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CPROF_REQUEST_TIMEOUT_SECS"
    ));
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("TIKTOK_CLIENT_KEY", "public-key");
    map.insert("TIKTOK_CLIENT_SECRET", "super-secret");
    map.insert("APIFY_TOKEN", "apify-secret");
    let config = build_app_config(lookup_from_map(&map)).unwrap();

    let debug = format!("{config:?}");
    assert!(debug.contains("public-key"));
    assert!(!debug.contains("super-secret"));
    assert!(!debug.contains("apify-secret"));
}
