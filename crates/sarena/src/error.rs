//! Arena error types.

use thiserror::Error;

/// Errors returned by fallible arena operations.
///
/// Every failing call leaves the arena exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The memory provider could not supply a new region buffer.
    #[error("allocation failure: could not reserve {requested} bytes for a region")]
    AllocationFailure {
        /// Size of the region buffer that was requested.
        requested: usize,
    },
    /// A caller-supplied argument was rejected before any state was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    /// Growth would exceed the configured region limit.
    #[error("region limit reached: arena may hold at most {limit} regions")]
    RegionLimitReached {
        /// The configured `max_regions`.
        limit: usize,
    },
}

/// The specific argument that made an operation fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// `region_capacity` was zero at creation.
    #[error("region capacity must be greater than zero")]
    ZeroRegionCapacity,
    /// `max_regions` was `Some(0)`.
    #[error("region limit must be greater than zero")]
    ZeroRegionLimit,
    /// An allocation of zero bytes was requested.
    #[error("allocation size must be greater than zero")]
    ZeroSize,
    /// A single allocation may never outgrow one region.
    #[error("requested {size} bytes, but regions hold at most {region_capacity} bytes")]
    OversizedRequest {
        /// Number of bytes requested.
        size: usize,
        /// Capacity of every region in the arena.
        region_capacity: usize,
    },
}

impl ArenaError {
    /// Whether this error was caused by the caller rather than by memory pressure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
