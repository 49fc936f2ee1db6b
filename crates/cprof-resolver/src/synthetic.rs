//! Deterministic placeholder profiles.
//!
//! Every value derives from a checksum of `"{platform}:{handle}"`, so the
//! same input always yields the same profile and no randomness is involved.

use cprof_core::{Platform, Profile, SYNTHETIC_PROVIDER};

const BIOGRAPHIES: &[&str] = &[
    "Creator sharing everyday moments.",
    "Lifestyle, travel and good coffee.",
    "Tech reviews and honest opinions.",
    "Fitness tips and weekly challenges.",
    "Food, recipes and kitchen experiments.",
    "Fashion finds and styling ideas.",
    "Music covers and behind the scenes.",
    "Gaming highlights and live streams.",
];

/// 31-multiplier rolling checksum over the characters of `input`.
fn seed(input: &str) -> u32 {
    input
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(u32::from(c)))
}

/// Builds the placeholder profile for `handle` on `platform`.
#[must_use]
pub fn generate(platform: Platform, handle: &str) -> Profile {
    let seed = seed(&format!("{platform}:{handle}"));

    let follower_count = 1_000 + u64::from(seed % 99_000);
    let following_count = 50 + u64::from((seed / 7) % 950);
    let post_count = 10 + u64::from((seed / 13) % 490);
    let engagement_rate = 1.0 + f64::from(seed % 900) / 100.0;
    let biography = BIOGRAPHIES[(seed as usize) % BIOGRAPHIES.len()];
    // Roughly one profile in twenty.
    let is_verified = (seed / 17) % 20 == 0;

    Profile {
        platform,
        username: handle.to_string(),
        display_name: display_name_from(handle),
        biography: biography.to_string(),
        follower_count,
        following_count,
        post_count,
        is_verified,
        avatar_url: String::new(),
        engagement_rate,
        is_synthetic: true,
        source_provider: SYNTHETIC_PROVIDER.to_string(),
    }
}

/// `"jane.doe_99"` becomes `"Jane Doe 99"`.
fn display_name_from(handle: &str) -> String {
    let words: Vec<String> = handle
        .split(['.', '_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();

    if words.is_empty() {
        handle.to_string()
    } else {
        words.join(" ")
    }
}
