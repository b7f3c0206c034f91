//! Benchmark profiles and utilities for SArena.
//!
//! Provides pre-built [`ArenaConfig`] profiles for benchmarks and examples:
//!
//! - [`request_profile`]: 64 KiB regions, for per-request scratch data
//! - [`frame_profile`]: 1 MB regions, for per-frame bulk data
//! - [`request_sizes`]: deterministic mixed request sizes via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sarena::{ArenaConfig, ResetPolicy};

/// Region capacity of [`request_profile`].
pub const REQUEST_REGION_CAPACITY: usize = 64 * 1024;

/// Region capacity of [`frame_profile`].
pub const FRAME_REGION_CAPACITY: usize = 1_000_000;

/// Build a per-request profile: 64 KiB regions, first region kept on reset.
pub fn request_profile() -> ArenaConfig {
    ArenaConfig::new(REQUEST_REGION_CAPACITY)
}

/// Build a per-frame profile: 1 MB regions, all regions released on reset.
pub fn frame_profile() -> ArenaConfig {
    ArenaConfig::new(FRAME_REGION_CAPACITY).with_reset_policy(ResetPolicy::Reallocate)
}

/// Generate `n` deterministic request sizes in `1..=max`.
///
/// Sizes are skewed small (most under `max / 8`), the shape an arena is
/// meant for.
pub fn request_sizes(n: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let r = (state >> 33) as usize;
            let bound = if r % 16 == 0 { max } else { (max / 8).max(1) };
            1 + r % bound
        })
        .collect()
}
