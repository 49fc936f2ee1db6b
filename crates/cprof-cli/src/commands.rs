//! Command handlers. Profiles go to stdout as JSON; diagnostics go to stderr.

use cprof_core::{normalize_handle, AppConfig, Platform, ProvidersFile};
use cprof_resolver::{AttemptOutcome, ProfileResolver, ResolveError};

fn load_providers(config: &AppConfig) -> anyhow::Result<ProvidersFile> {
    match &config.providers_path {
        Some(path) => Ok(cprof_core::load_providers(path)?),
        None => Ok(ProvidersFile::default()),
    }
}

fn build_resolver(config: &AppConfig) -> anyhow::Result<ProfileResolver> {
    let providers = load_providers(config)?;
    Ok(ProfileResolver::from_config(config, &providers)?)
}

/// Resolves one handle and prints the profile.
///
/// # Errors
///
/// Returns an error if the handle is empty, the account does not exist, or
/// the resolver cannot be built.
pub(crate) async fn run_resolve(
    config: &AppConfig,
    platform: Platform,
    handle: &str,
    report: bool,
) -> anyhow::Result<()> {
    let resolver = build_resolver(config)?;
    tracing::debug!(%platform, handle, "resolving profile");

    let resolution = match resolver.resolve_with_report(platform, handle).await {
        Ok(resolution) => resolution,
        Err(ResolveError::NotFound {
            username, provider, ..
        }) => {
            anyhow::bail!("no {platform} account named '{username}' (reported by {provider})");
        }
        Err(e) => return Err(e.into()),
    };

    if report {
        for attempt in &resolution.attempts {
            eprintln!("{:<28} {}", attempt.provider, describe(attempt.outcome));
        }
        eprintln!(
            "{} provider error(s); profile from {}",
            resolution.provider_errors(),
            resolution.profile.source_provider
        );
    }

    println!("{}", serde_json::to_string_pretty(&resolution.profile)?);
    Ok(())
}

/// Prints the synthetic profile for `handle`.
///
/// # Errors
///
/// Returns an error if the handle is empty after normalization.
pub(crate) fn run_synthetic(platform: Platform, handle: &str) -> anyhow::Result<()> {
    let username = normalize_handle(handle)?;
    let profile = cprof_resolver::generate(platform, &username);
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Prints each platform's chain in order, ending with the synthetic fallback.
///
/// # Errors
///
/// Returns an error if the provider file cannot be loaded.
pub(crate) fn run_providers(config: &AppConfig) -> anyhow::Result<()> {
    let resolver = build_resolver(config)?;

    for platform in Platform::ALL {
        println!("{platform}:");
        for (position, adapter) in resolver.chain(platform).iter().enumerate() {
            let state = if adapter.is_available() {
                "ready"
            } else {
                "not configured"
            };
            println!("  {}. {:<28} {state}", position + 1, adapter.id());
        }
        println!("  -> synthetic fallback");
    }
    Ok(())
}

fn describe(outcome: AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Succeeded => "succeeded".to_string(),
        AttemptOutcome::Skipped => "skipped (not configured)".to_string(),
        AttemptOutcome::Failed(kind) => format!("failed ({kind})"),
    }
}
