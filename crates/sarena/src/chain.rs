//! Ordered chain of regions.
//!
//! [`RegionChain`] is a `VecDeque<Region>`: the head is index 0 and the tail
//! is the last index. Regions are only ever appended at the tail and removed
//! from the head (or truncated down to the head), so indices of surviving
//! regions never shift except by `pop_front`.

use std::collections::VecDeque;

use crate::error::ArenaError;
use crate::region::Region;

pub(crate) struct RegionChain {
    regions: VecDeque<Region>,
}

impl RegionChain {
    /// Create an empty chain.
    pub(crate) fn new() -> Self {
        Self {
            regions: VecDeque::new(),
        }
    }

    /// Allocate a region of `capacity` bytes and link it after the tail.
    ///
    /// On failure the chain is unchanged.
    pub(crate) fn append(&mut self, capacity: usize) -> Result<(), ArenaError> {
        let region = Region::new(capacity)?;
        self.push_back(region);
        Ok(())
    }

    /// Link an already-allocated region after the tail.
    pub(crate) fn push_back(&mut self, region: Region) {
        self.regions.push_back(region);
    }

    /// Unlink the head region. It is released when the returned value drops.
    pub(crate) fn pop_front(&mut self) -> Option<Region> {
        self.regions.pop_front()
    }

    /// Release every region. Returns how many were released.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut released = 0;
        while self.pop_front().is_some() {
            released += 1;
        }
        released
    }

    /// Release every region except the head. Returns how many were released.
    pub(crate) fn truncate_to_head(&mut self) -> usize {
        let released = self.regions.len().saturating_sub(1);
        self.regions.truncate(1);
        released
    }

    /// Set `used = 0` on every region, head to tail.
    pub(crate) fn clear_all(&mut self) {
        for region in &mut self.regions {
            region.clear();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Index of the tail region. Meaningless on an empty chain.
    pub(crate) fn tail_index(&self) -> usize {
        self.regions.len().saturating_sub(1)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Region> {
        self.regions.get_mut(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}
