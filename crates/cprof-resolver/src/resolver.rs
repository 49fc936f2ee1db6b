//! Provider-chain orchestration.
//!
//! Each platform has a fixed, ordered adapter chain. Adapters run strictly
//! one after another; the first payload that normalizes wins, an
//! authoritative not-found ends the chain with an error, and every other
//! failure moves on to the next adapter. An exhausted chain yields the
//! synthetic profile.

use std::collections::HashMap;
use std::sync::Arc;

use cprof_core::{normalize_handle, AppConfig, Platform, Profile, ProvidersFile};
use cprof_jobs::{JobBackend, JobServiceClient};
use serde::Serialize;

use crate::adapters::{
    build_http_client, JobPollingAdapter, OfficialApiAdapter, ProfileAdapter, PublicPageAdapter,
};
use crate::error::{AdapterError, FailureKind, ResolveError, SetupError};
use crate::normalize::normalize;
use crate::synthetic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    /// The adapter was not configured and made no call.
    Skipped,
    Failed(FailureKind),
}

/// What happened when one adapter was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub provider: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub profile: Profile,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    /// Number of adapters that actually failed. Skipped adapters don't count.
    #[must_use]
    pub fn provider_errors(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed(_)))
            .count()
    }
}

pub struct ProfileResolver {
    chains: HashMap<Platform, Vec<Arc<dyn ProfileAdapter>>>,
}

#[derive(Default)]
pub struct ProfileResolverBuilder {
    chains: HashMap<Platform, Vec<Arc<dyn ProfileAdapter>>>,
}

impl ProfileResolverBuilder {
    /// Appends `adapter` to the end of `platform`'s chain.
    #[must_use]
    pub fn adapter(mut self, platform: Platform, adapter: Arc<dyn ProfileAdapter>) -> Self {
        self.chains.entry(platform).or_default().push(adapter);
        self
    }

    #[must_use]
    pub fn build(self) -> ProfileResolver {
        ProfileResolver {
            chains: self.chains,
        }
    }
}

impl ProfileResolver {
    #[must_use]
    pub fn builder() -> ProfileResolverBuilder {
        ProfileResolverBuilder::default()
    }

    /// Wires the production chains:
    ///
    /// - TikTok: official API, then TikTok job services, then public page.
    /// - Instagram: public page, then Instagram job services.
    /// - YouTube: public page.
    ///
    /// Job services come from `providers` in file order and share one client.
    /// YouTube job services never reach this point; provider validation
    /// rejects them.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if an HTTP client cannot be constructed.
    pub fn from_config(
        config: &AppConfig,
        providers: &ProvidersFile,
    ) -> Result<Self, SetupError> {
        let http = build_http_client(config.request_timeout_secs, &config.user_agent)?;

        let backend: Option<Arc<dyn JobBackend>> = match &config.job_service_token {
            Some(token) => Some(Arc::new(JobServiceClient::new(
                token,
                config.request_timeout_secs,
            )?)),
            None => None,
        };

        let mut builder = Self::builder()
            .adapter(
                Platform::TikTok,
                Arc::new(OfficialApiAdapter::new(
                    http.clone(),
                    config.tiktok_credentials.clone(),
                )),
            )
            .adapter(
                Platform::Instagram,
                Arc::new(PublicPageAdapter::new(Platform::Instagram, http.clone())),
            )
            .adapter(
                Platform::YouTube,
                Arc::new(PublicPageAdapter::new(Platform::YouTube, http.clone())),
            );

        for platform in [Platform::TikTok, Platform::Instagram] {
            for service in providers.for_platform(platform) {
                builder = builder.adapter(
                    platform,
                    Arc::new(JobPollingAdapter::new(service.clone(), backend.clone())),
                );
            }
        }

        Ok(builder
            .adapter(
                Platform::TikTok,
                Arc::new(PublicPageAdapter::new(Platform::TikTok, http)),
            )
            .build())
    }

    /// Adapters tried for `platform`, in order.
    #[must_use]
    pub fn chain(&self, platform: Platform) -> &[Arc<dyn ProfileAdapter>] {
        self.chains
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolves `handle` on `platform` to a canonical profile.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidHandle`] if `handle` normalizes to nothing.
    /// - [`ResolveError::NotFound`] if an adapter reports the account does
    ///   not exist.
    pub async fn resolve_profile(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<Profile, ResolveError> {
        self.resolve_with_report(platform, handle)
            .await
            .map(|resolution| resolution.profile)
    }

    /// Like [`ProfileResolver::resolve_profile`], also returning the
    /// per-adapter attempt log.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileResolver::resolve_profile`].
    pub async fn resolve_with_report(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<Resolution, ResolveError> {
        let username = normalize_handle(handle)?;
        let mut attempts = Vec::new();

        for adapter in self.chain(platform) {
            let provider = adapter.id().to_string();

            let result = match adapter.fetch(&username).await {
                Ok(payload) => {
                    normalize(platform, &payload, &provider, &username).map_err(AdapterError::from)
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(profile) => {
                    tracing::info!(
                        %platform,
                        handle = %username,
                        provider = %provider,
                        followers = profile.follower_count,
                        "profile resolved"
                    );
                    attempts.push(Attempt {
                        provider,
                        outcome: AttemptOutcome::Succeeded,
                    });
                    return Ok(Resolution { profile, attempts });
                }
                Err(AdapterError::NotFound { provider, .. }) => {
                    tracing::info!(
                        %platform,
                        handle = %username,
                        provider = %provider,
                        "profile not found"
                    );
                    return Err(ResolveError::NotFound {
                        platform,
                        username,
                        provider,
                    });
                }
                Err(AdapterError::Unavailable { .. }) => {
                    tracing::debug!(
                        %platform,
                        provider = %provider,
                        "adapter not configured, skipping"
                    );
                    attempts.push(Attempt {
                        provider,
                        outcome: AttemptOutcome::Skipped,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        %platform,
                        handle = %username,
                        provider = %provider,
                        kind = %e.kind(),
                        error = %e,
                        "adapter failed, trying next provider"
                    );
                    attempts.push(Attempt {
                        provider,
                        outcome: AttemptOutcome::Failed(e.kind()),
                    });
                }
            }
        }

        tracing::warn!(
            %platform,
            handle = %username,
            attempted = attempts.len(),
            "all providers exhausted, using synthetic profile"
        );
        Ok(Resolution {
            profile: synthetic::generate(platform, &username),
            attempts,
        })
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
