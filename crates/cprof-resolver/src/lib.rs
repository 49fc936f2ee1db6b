//! Creator-profile resolution: adapters, normalizer, synthetic fallback and
//! the per-platform provider chain.

pub mod adapters;
pub mod error;
mod fields;
pub mod normalize;
mod parse;
pub mod payload;
pub mod resolver;
pub mod synthetic;

pub use adapters::{
    build_http_client, profile_url, JobPollingAdapter, OfficialApiAdapter, ProfileAdapter,
    PublicPageAdapter,
};
pub use error::{AdapterError, FailureKind, NormalizationError, ResolveError, SetupError};
pub use normalize::normalize;
pub use payload::RawPayload;
pub use resolver::{Attempt, AttemptOutcome, ProfileResolver, ProfileResolverBuilder, Resolution};
pub use synthetic::generate;
