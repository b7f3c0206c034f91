//! The thread-safe region arena.
//!
//! [`Arena`] owns a [`RegionChain`], an optional rewind cursor and a lock.
//! All allocation policy lives here; regions and the chain only do
//! structural bookkeeping.
//!
//! The arena runs in one of two modes:
//!
//! ```text
//!            create / reset
//!                  │
//!                  ▼
//!   ┌──────────► GROWTH ──── alloc: append a region when the tail is full
//!   │              │
//!   │   rewind (more than one region)
//!   │              ▼
//!   └─ cursor ── REWIND ──── alloc: advance the cursor when its region is full
//!   reaches tail
//! ```

use std::ptr::NonNull;

use parking_lot::Mutex;

use crate::chain::RegionChain;
use crate::config::{ArenaConfig, ResetPolicy};
use crate::error::{ArenaError, ArgumentError};
use crate::region::Region;

/// Which region an allocation that does not fit will move on to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocMode {
    /// A full tail causes a new region to be appended.
    Growth,
    /// Existing regions are replayed in order before any growth.
    Rewind,
}

/// A point-in-time summary of arena state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of regions in the chain.
    pub region_count: usize,
    /// Capacity of every region in bytes.
    pub region_capacity: usize,
    /// Bytes handed out since the last rewind or reset, across all regions.
    pub used_bytes: usize,
    /// Bytes held from the memory provider (`region_count * region_capacity`).
    pub reserved_bytes: usize,
    /// Current allocation mode.
    pub mode: AllocMode,
    /// Index of the region being replayed, in rewind mode.
    pub cursor: Option<usize>,
}

/// A thread-safe bump allocator over a growable chain of fixed-size regions.
///
/// Blocks are handed out as raw [`NonNull<u8>`] pointers with no alignment
/// guarantee beyond 1. A block stays valid until the next
/// [`rewind`](Arena::rewind), [`reset`](Arena::reset) or drop of the arena;
/// the arena does not enforce this, and every dereference is the caller's
/// `unsafe` responsibility.
///
/// Every method takes `&self` and holds the arena's own lock for its full
/// duration, so one arena can be shared between threads (e.g. via `Arc`).
///
/// # Example
///
/// ```rust
/// use sarena::Arena;
///
/// let arena = Arena::new(4096).unwrap();
/// let block = arena.alloc_zeroed(64).unwrap();
/// // SAFETY: 64 bytes were just allocated and zeroed.
/// let bytes = unsafe { std::slice::from_raw_parts(block.as_ptr(), 64) };
/// assert!(bytes.iter().all(|&b| b == 0));
///
/// arena.rewind();
/// assert_eq!(arena.alloc(64).unwrap(), block);
/// ```
pub struct Arena {
    config: ArenaConfig,
    state: Mutex<ArenaState>,
}

/// Everything guarded by the arena lock.
struct ArenaState {
    chain: RegionChain,
    /// `Some(i)` while replaying: region `i` is active and `i` is never the tail.
    rewind_cursor: Option<usize>,
}

impl Arena {
    /// Create an arena whose regions each hold `region_capacity` bytes.
    ///
    /// The first region is allocated immediately.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidArgument`] if `region_capacity` is zero.
    /// - [`ArenaError::AllocationFailure`] if the first region cannot be
    ///   allocated.
    pub fn new(region_capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(region_capacity))
    }

    /// Create an arena from a full configuration.
    ///
    /// # Errors
    ///
    /// As [`Arena::new`], plus [`ArenaError::InvalidArgument`] for a zero
    /// region limit.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;

        let mut chain = RegionChain::new();
        chain.append(config.region_capacity).inspect_err(|err| {
            tracing::warn!(%err, "failed to allocate the first region");
        })?;
        tracing::debug!(
            region_capacity = config.region_capacity,
            max_regions = ?config.max_regions,
            "arena created"
        );

        Ok(Self {
            config,
            state: Mutex::new(ArenaState {
                chain,
                rewind_cursor: None,
            }),
        })
    }

    /// Allocate `size` uninitialised bytes.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidArgument`] if `size` is zero or larger than
    ///   the region capacity.
    /// - [`ArenaError::AllocationFailure`] or
    ///   [`ArenaError::RegionLimitReached`] if a new region was needed and
    ///   could not be added. The arena is left unchanged.
    pub fn alloc(&self, size: usize) -> Result<NonNull<u8>, ArenaError> {
        self.check_size(size)?;
        let mut state = self.state.lock();
        let (index, offset) = state.bump(&self.config, size)?;
        Ok(state.region(index).block(offset))
    }

    /// Allocate `size` bytes, all set to zero.
    ///
    /// # Errors
    ///
    /// Same as [`Arena::alloc`].
    pub fn alloc_zeroed(&self, size: usize) -> Result<NonNull<u8>, ArenaError> {
        self.check_size(size)?;
        let mut state = self.state.lock();
        let (index, offset) = state.bump(&self.config, size)?;
        let region = state.region_mut(index);
        region.zero(offset, size);
        Ok(region.block(offset))
    }

    /// Make every byte of every region available again without releasing
    /// any memory.
    ///
    /// With more than one region the arena enters rewind mode: subsequent
    /// allocations refill the existing regions head to tail before any new
    /// region is appended. Every previously returned block is invalidated.
    pub fn rewind(&self) {
        let mut state = self.state.lock();
        if state.chain.is_empty() {
            return;
        }
        state.chain.clear_all();
        let regions = state.chain.len();
        state.rewind_cursor = (regions > 1).then_some(0);
        tracing::trace!(regions, "arena rewound");
    }

    /// Return the arena to its freshly created state: one empty region,
    /// growth mode.
    ///
    /// Every region but the first is released to the memory provider. What
    /// happens to the first depends on [`ArenaConfig::reset_policy`]. Every
    /// previously returned block is invalidated.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if state.chain.is_empty() {
            return;
        }
        state.rewind_cursor = None;

        let released = match self.config.reset_policy {
            ResetPolicy::KeepFirst => state.keep_first(),
            ResetPolicy::Reallocate => match Region::new(self.config.region_capacity) {
                Ok(fresh) => {
                    let released = state.chain.release_all();
                    state.chain.push_back(fresh);
                    released
                }
                Err(err) => {
                    tracing::warn!(%err, "reset could not reallocate the first region, keeping it");
                    state.keep_first()
                }
            },
        };
        tracing::debug!(released, policy = ?self.config.reset_policy, "arena reset");
    }

    /// Capacity of every region, and the largest allowed allocation.
    pub fn region_capacity(&self) -> usize {
        self.config.region_capacity
    }

    /// The configuration this arena was created with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of regions currently held.
    pub fn region_count(&self) -> usize {
        self.state.lock().chain.len()
    }

    /// Current allocation mode.
    pub fn mode(&self) -> AllocMode {
        self.state.lock().mode()
    }

    /// Snapshot of region count, usage and mode, taken under the lock.
    pub fn stats(&self) -> ArenaStats {
        let state = self.state.lock();
        let region_count = state.chain.len();
        ArenaStats {
            region_count,
            region_capacity: self.config.region_capacity,
            used_bytes: state.chain.iter().map(Region::used).sum(),
            reserved_bytes: state.chain.iter().map(Region::capacity).sum(),
            mode: state.mode(),
            cursor: state.rewind_cursor,
        }
    }

    /// Whether `addr` points into any region currently held by this arena.
    ///
    /// This says nothing about whether the byte is part of a live block.
    pub fn contains(&self, addr: *const u8) -> bool {
        self.state.lock().chain.iter().any(|r| r.contains(addr))
    }

    fn check_size(&self, size: usize) -> Result<(), ArenaError> {
        if size == 0 {
            return Err(ArgumentError::ZeroSize.into());
        }
        if size > self.config.region_capacity {
            return Err(ArgumentError::OversizedRequest {
                size,
                region_capacity: self.config.region_capacity,
            }
            .into());
        }
        Ok(())
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        state.rewind_cursor = None;
        let released = state.chain.release_all();
        tracing::trace!(released, "arena dropped");
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ArenaState {
    fn mode(&self) -> AllocMode {
        match self.rewind_cursor {
            Some(_) => AllocMode::Rewind,
            None => AllocMode::Growth,
        }
    }

    /// Bump-allocate `size` bytes (already validated against the region
    /// capacity), moving to the next region if the active one is full.
    ///
    /// Returns `(region_index, offset)`.
    fn bump(&mut self, config: &ArenaConfig, size: usize) -> Result<(usize, usize), ArenaError> {
        let active = self
            .rewind_cursor
            .unwrap_or_else(|| self.chain.tail_index());
        if let Some(offset) = self.chain.get_mut(active).and_then(|r| r.bump(size)) {
            return Ok((active, offset));
        }

        // Active region exhausted. No best-fit search: whatever is left in
        // it stays unused until the next rewind or reset.
        let next = match self.rewind_cursor {
            None => {
                self.grow(config)?;
                self.chain.tail_index()
            }
            Some(cursor) => {
                let next = cursor + 1;
                // Reaching the tail ends the replay.
                self.rewind_cursor = (next < self.chain.tail_index()).then_some(next);
                next
            }
        };

        let offset = self
            .region_mut(next)
            .bump(size)
            .expect("size <= region_capacity, so an empty region always fits");
        Ok((next, offset))
    }

    /// Append one region, respecting the configured limit.
    fn grow(&mut self, config: &ArenaConfig) -> Result<(), ArenaError> {
        let result = config
            .allows_growth(self.chain.len())
            .and_then(|()| self.chain.append(config.region_capacity));
        match &result {
            Ok(()) => tracing::debug!(
                regions = self.chain.len(),
                region_capacity = config.region_capacity,
                "region chain grew"
            ),
            Err(err) => tracing::warn!(%err, regions = self.chain.len(), "region chain cannot grow"),
        }
        result
    }

    /// Drop every region but the head and clear the head. Returns how many
    /// regions were released.
    fn keep_first(&mut self) -> usize {
        let released = self.chain.truncate_to_head();
        self.chain.clear_all();
        released
    }

    fn region(&self, index: usize) -> &Region {
        self.chain
            .get(index)
            .expect("region index produced by bump is always in the chain")
    }

    fn region_mut(&mut self, index: usize) -> &mut Region {
        self.chain
            .get_mut(index)
            .expect("region index produced by bump is always in the chain")
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn addr(ptr: NonNull<u8>) -> usize {
        ptr.as_ptr() as usize
    }

    #[test]
    fn arena_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arena>();
    }

    #[test]
    fn new_arena_has_one_empty_region() {
        let arena = Arena::new(256).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.region_count, 1);
        assert_eq!(stats.used_bytes, 0);
        assert_eq!(stats.reserved_bytes, 256);
        assert_eq!(stats.mode, AllocMode::Growth);
        assert_eq!(stats.cursor, None);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = Arena::new(0).unwrap_err();
        assert_eq!(
            err,
            ArenaError::InvalidArgument(ArgumentError::ZeroRegionCapacity)
        );
    }

    #[test]
    fn unobtainable_first_region_reports_allocation_failure() {
        let err = Arena::new(usize::MAX).unwrap_err();
        assert_eq!(err, ArenaError::AllocationFailure { requested: usize::MAX });
    }

    #[test]
    fn invalid_sizes_rejected_without_mutation() {
        let arena = Arena::new(100).unwrap();
        arena.alloc(40).unwrap();
        let before = arena.stats();

        assert_eq!(
            arena.alloc(0).unwrap_err(),
            ArenaError::InvalidArgument(ArgumentError::ZeroSize)
        );
        assert_eq!(
            arena.alloc_zeroed(101).unwrap_err(),
            ArenaError::InvalidArgument(ArgumentError::OversizedRequest {
                size: 101,
                region_capacity: 100,
            })
        );
        assert_eq!(arena.stats(), before);
    }

    #[test]
    fn bumps_within_region_are_contiguous() {
        let arena = Arena::new(100).unwrap();
        let a = arena.alloc(30).unwrap();
        let b = arena.alloc(30).unwrap();
        assert_eq!(addr(b) - addr(a), 30);
        assert_eq!(arena.stats().used_bytes, 60);
    }

    #[test]
    fn full_tail_appends_region() {
        let arena = Arena::new(100).unwrap();
        let a = arena.alloc(60).unwrap();
        let b = arena.alloc(60).unwrap();
        assert_eq!(arena.region_count(), 2);
        assert!(addr(b) + 60 <= addr(a) || addr(a) + 60 <= addr(b));
        // The 40 bytes left in the first region stay unused.
        assert_eq!(arena.stats().used_bytes, 120);
    }

    #[test]
    fn exact_capacity_fits_in_one_region() {
        let arena = Arena::new(100).unwrap();
        arena.alloc(100).unwrap();
        assert_eq!(arena.region_count(), 1);
        arena.alloc(1).unwrap();
        assert_eq!(arena.region_count(), 2);
    }

    #[test]
    fn alloc_zeroed_clears_reused_memory() {
        let arena = Arena::new(64).unwrap();
        let first = arena.alloc(64).unwrap();
        unsafe { std::ptr::write_bytes(first.as_ptr(), 0xFF, 64) };

        arena.rewind();
        let again = arena.alloc_zeroed(64).unwrap();
        assert_eq!(again, first);
        let bytes = unsafe { std::slice::from_raw_parts(again.as_ptr(), 64) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn rewind_single_region_stays_in_growth_mode() {
        let arena = Arena::new(64).unwrap();
        let first = arena.alloc(10).unwrap();
        arena.rewind();
        assert_eq!(arena.mode(), AllocMode::Growth);
        assert_eq!(arena.stats().used_bytes, 0);
        assert_eq!(arena.alloc(10).unwrap(), first);
    }

    #[test]
    fn rewind_replays_regions_in_order() {
        let arena = Arena::new(100).unwrap();
        let originals: Vec<_> = (0..3).map(|_| arena.alloc(100).unwrap()).collect();
        assert_eq!(arena.region_count(), 3);

        arena.rewind();
        assert_eq!(arena.mode(), AllocMode::Rewind);
        assert_eq!(arena.stats().cursor, Some(0));

        assert_eq!(arena.alloc(100).unwrap(), originals[0]);
        assert_eq!(arena.stats().cursor, Some(0));

        // Advancing to region 1 keeps replaying.
        assert_eq!(arena.alloc(100).unwrap(), originals[1]);
        assert_eq!(arena.stats().cursor, Some(1));

        // Advancing to the tail ends the replay.
        assert_eq!(arena.alloc(100).unwrap(), originals[2]);
        assert_eq!(arena.mode(), AllocMode::Growth);
        assert_eq!(arena.region_count(), 3);

        // Only now does the chain grow.
        arena.alloc(1).unwrap();
        assert_eq!(arena.region_count(), 4);
    }

    #[test]
    fn rewind_mid_replay_restarts_at_head() {
        let arena = Arena::new(50).unwrap();
        let head = arena.alloc(50).unwrap();
        arena.alloc(50).unwrap();
        arena.alloc(50).unwrap();

        arena.rewind();
        arena.alloc(50).unwrap();
        arena.alloc(50).unwrap();
        assert_eq!(arena.stats().cursor, Some(1));

        arena.rewind();
        assert_eq!(arena.stats().cursor, Some(0));
        assert_eq!(arena.alloc(10).unwrap(), head);
    }

    #[test]
    fn reset_keeps_first_region() {
        let arena = Arena::new(64).unwrap();
        let first = arena.alloc(64).unwrap();
        arena.alloc(64).unwrap();
        arena.alloc(64).unwrap();
        arena.rewind();
        arena.alloc(8).unwrap();

        arena.reset();
        let stats = arena.stats();
        assert_eq!(stats.region_count, 1);
        assert_eq!(stats.used_bytes, 0);
        assert_eq!(stats.mode, AllocMode::Growth);
        assert_eq!(arena.alloc(8).unwrap(), first);
    }

    #[test]
    fn reallocating_reset_leaves_one_empty_region() {
        let config = ArenaConfig::new(64).with_reset_policy(ResetPolicy::Reallocate);
        let arena = Arena::with_config(config).unwrap();
        arena.alloc(64).unwrap();
        arena.alloc(64).unwrap();

        arena.reset();
        let stats = arena.stats();
        assert_eq!(stats.region_count, 1);
        assert_eq!(stats.used_bytes, 0);
        assert_eq!(stats.cursor, None);

        let a = arena.alloc(16).unwrap();
        let b = arena.alloc(16).unwrap();
        assert_eq!(addr(b) - addr(a), 16);
    }

    #[test]
    fn region_limit_failure_leaves_state_unchanged() {
        let config = ArenaConfig::new(32).with_max_regions(2);
        let arena = Arena::with_config(config).unwrap();
        arena.alloc(32).unwrap();
        arena.alloc(20).unwrap();
        let before = arena.stats();

        assert_eq!(
            arena.alloc(20).unwrap_err(),
            ArenaError::RegionLimitReached { limit: 2 }
        );
        assert_eq!(arena.stats(), before);

        // Space left in the tail is still usable.
        arena.alloc(12).unwrap();
        assert_eq!(arena.region_count(), 2);
    }

    #[test]
    fn region_limit_does_not_block_replay() {
        let config = ArenaConfig::new(32).with_max_regions(2);
        let arena = Arena::with_config(config).unwrap();
        arena.alloc(32).unwrap();
        arena.alloc(32).unwrap();

        arena.rewind();
        arena.alloc(32).unwrap();
        arena.alloc(32).unwrap();
        assert!(arena.alloc(1).is_err());
    }

    #[test]
    fn contains_tracks_live_regions() {
        let arena = Arena::new(16).unwrap();
        let a = arena.alloc(16).unwrap();
        let b = arena.alloc(16).unwrap();
        assert!(arena.contains(a.as_ptr()));
        assert!(arena.contains(b.as_ptr()));

        arena.reset();
        assert!(arena.contains(a.as_ptr()));
        assert!(!arena.contains(b.as_ptr()));
    }

    proptest! {
        #[test]
        fn allocations_never_overlap(
            region_capacity in 1usize..512,
            fractions in proptest::collection::vec(0.0f64..1.0, 1..64),
        ) {
            let arena = Arena::new(region_capacity).unwrap();
            let mut spans = Vec::new();
            for f in fractions {
                let size = 1 + (f * (region_capacity - 1) as f64) as usize;
                let block = arena.alloc(size).unwrap();
                spans.push((addr(block), size));
            }
            spans.sort_unstable();
            for pair in spans.windows(2) {
                prop_assert!(pair[0].0 + pair[0].1 <= pair[1].0);
            }
            let stats = arena.stats();
            prop_assert!(stats.used_bytes <= stats.reserved_bytes);
        }

        #[test]
        fn invalid_sizes_never_mutate(
            region_capacity in 1usize..4096,
            prefix in proptest::collection::vec(1usize..64, 0..16),
            excess in 1usize..1024,
        ) {
            let arena = Arena::new(region_capacity).unwrap();
            for size in prefix {
                let _ = arena.alloc(size.min(region_capacity));
            }
            let before = arena.stats();
            prop_assert!(arena.alloc(0).unwrap_err().is_invalid_argument());
            prop_assert!(arena.alloc(region_capacity + excess).unwrap_err().is_invalid_argument());
            prop_assert_eq!(arena.stats(), before);
        }

        #[test]
        fn replay_reuses_every_region_before_growing(
            regions in 2usize..8,
            region_capacity in 8usize..128,
        ) {
            let arena = Arena::new(region_capacity).unwrap();
            let originals: Vec<_> = (0..regions)
                .map(|_| arena.alloc(region_capacity).unwrap())
                .collect();
            arena.rewind();
            for original in &originals {
                prop_assert_eq!(arena.alloc(region_capacity).unwrap(), *original);
            }
            prop_assert_eq!(arena.region_count(), regions);
            prop_assert_eq!(arena.mode(), AllocMode::Growth);
        }
    }
}
