//! Arena configuration parameters.

use crate::error::{ArenaError, ArgumentError};

/// What [`Arena::reset`](crate::Arena::reset) does with the first region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Release every region except the first and clear the first in place.
    /// The first region's buffer address survives the reset.
    #[default]
    KeepFirst,
    /// Release every region and allocate a fresh first region.
    ///
    /// If the fresh region cannot be allocated the arena falls back to
    /// `KeepFirst` behaviour, so a reset never leaves the arena empty.
    Reallocate,
}

/// Configuration for the arena allocator.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Byte capacity of every region the arena allocates.
    ///
    /// Also the upper bound on a single allocation. Should be much larger
    /// than typical request sizes: a request that does not fit in the
    /// remaining space of the active region moves on to the next region
    /// and the leftover bytes stay unused until the next rewind or reset.
    ///
    /// Default: 65_536 (64 KiB). Must be greater than zero.
    pub region_capacity: usize,

    /// Maximum number of regions the chain may grow to.
    ///
    /// Default: `None` (bounded only by the memory provider).
    pub max_regions: Option<usize>,

    /// Reset behaviour. Default: [`ResetPolicy::KeepFirst`].
    pub reset_policy: ResetPolicy,
}

impl ArenaConfig {
    /// Default region capacity: 64 KiB.
    pub const DEFAULT_REGION_CAPACITY: usize = 64 * 1024;

    /// Create a config with the given region capacity and defaults elsewhere.
    pub fn new(region_capacity: usize) -> Self {
        Self {
            region_capacity,
            max_regions: None,
            reset_policy: ResetPolicy::default(),
        }
    }

    /// Return a copy with the region limit set.
    pub fn with_max_regions(mut self, max_regions: usize) -> Self {
        self.max_regions = Some(max_regions);
        self
    }

    /// Return a copy with the reset policy set.
    pub fn with_reset_policy(mut self, reset_policy: ResetPolicy) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    /// Check the structural constraints on every field.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.region_capacity == 0 {
            return Err(ArgumentError::ZeroRegionCapacity.into());
        }
        if self.max_regions == Some(0) {
            return Err(ArgumentError::ZeroRegionLimit.into());
        }
        Ok(())
    }

    /// Whether a chain of `region_count` regions may grow by one more.
    pub(crate) fn allows_growth(&self, region_count: usize) -> Result<(), ArenaError> {
        match self.max_regions {
            Some(limit) if region_count >= limit => Err(ArenaError::RegionLimitReached { limit }),
            _ => Ok(()),
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REGION_CAPACITY)
    }
}
