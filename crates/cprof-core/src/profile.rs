use serde::{Deserialize, Serialize};

use crate::Platform;

/// Provider id stamped on generated placeholder profiles.
pub const SYNTHETIC_PROVIDER: &str = "synthetic";

/// Canonical creator profile, one per resolution.
///
/// Every field is always populated: unknown counts are `0`, unknown text is
/// empty. Consumers branch on `is_synthetic` to tell placeholder data apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub platform: Platform,
    pub username: String,
    pub display_name: String,
    pub biography: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub is_verified: bool,
    pub avatar_url: String,
    /// Percentage, rounded to two decimals.
    pub engagement_rate: f64,
    pub is_synthetic: bool,
    pub source_provider: String,
}
