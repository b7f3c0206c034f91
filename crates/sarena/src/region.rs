//! Fixed-capacity bump-allocated regions.
//!
//! A [`Region`] is a contiguous byte buffer with a cursor that advances on
//! each allocation. Regions never resize; the arena grows by adding more of
//! them.

use std::ptr::NonNull;

use crate::error::ArenaError;
use crate::raw::RawBuffer;

/// A single contiguous memory region with bump allocation.
///
/// The buffer is left uninitialised on creation; only
/// [`zero`](Region::zero) writes to it.
pub(crate) struct Region {
    /// Backing storage, allocated to full capacity at creation.
    buffer: RawBuffer,
    /// Bump pointer: bytes already handed out.
    used: usize,
}

impl Region {
    /// Allocate a region of `capacity` bytes.
    pub(crate) fn new(capacity: usize) -> Result<Self, ArenaError> {
        let buffer = RawBuffer::allocate(capacity).ok_or(ArenaError::AllocationFailure {
            requested: capacity,
        })?;
        Ok(Self { buffer, used: 0 })
    }

    /// Bump-allocate `size` bytes.
    ///
    /// Returns the starting offset within this region, or `None` if there is
    /// insufficient remaining capacity.
    pub(crate) fn bump(&mut self, size: usize) -> Option<usize> {
        if size > self.remaining() {
            return None;
        }
        let offset = self.used;
        self.used += size;
        Some(offset)
    }

    /// Address of the byte at `offset`.
    pub(crate) fn block(&self, offset: usize) -> NonNull<u8> {
        self.buffer.at(offset)
    }

    /// Zero `len` bytes starting at `offset`.
    pub(crate) fn zero(&mut self, offset: usize, len: usize) {
        self.buffer.zero(offset, len);
    }

    /// Reset the bump pointer to zero without releasing or zeroing memory.
    pub(crate) fn clear(&mut self) {
        self.used = 0;
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Whether `addr` lies inside this region's buffer.
    pub(crate) fn contains(&self, addr: *const u8) -> bool {
        self.buffer.contains(addr)
    }
}
