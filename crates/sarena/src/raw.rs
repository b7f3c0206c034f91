//! Low-level primitives for region buffers.
//!
//! This is the only module in the crate that contains `unsafe` code. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// An owned, fixed-size, uninitialised byte buffer obtained from the global
/// allocator.
///
/// The buffer's address never changes while the value is alive, so pointers
/// handed out from it stay valid across moves of the owning `Region`.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: `RawBuffer` uniquely owns its allocation and exposes no shared
// interior state; moving it to another thread moves that ownership.
unsafe impl Send for RawBuffer {}

impl RawBuffer {
    /// Allocate `len` bytes. Returns `None` if `len` is zero, if `len`
    /// exceeds `isize::MAX`, or if the global allocator is exhausted.
    pub(crate) fn allocate(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let layout = Layout::array::<u8>(len).ok()?;
        // SAFETY: `layout` has non-zero size (checked above).
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw).map(|ptr| Self { ptr, len })
    }

    /// Buffer length in bytes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Address of the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len`.
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        assert!(offset <= self.len, "offset {offset} out of buffer of {} bytes", self.len);
        // SAFETY: `offset <= len`, so the result is within (or one past the
        // end of) the allocation and cannot be null.
        unsafe { self.ptr.add(offset) }
    }

    /// Overwrite `len` bytes starting at `offset` with zero.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie inside the buffer.
    pub(crate) fn zero(&mut self, offset: usize, len: usize) {
        let end = offset.checked_add(len);
        assert!(
            end.is_some_and(|end| end <= self.len),
            "zero range {offset}+{len} out of buffer of {} bytes",
            self.len
        );
        // SAFETY: the range was checked to lie inside the allocation, and
        // `u8` has no invalid bit patterns.
        unsafe { ptr::write_bytes(self.ptr.as_ptr().add(offset), 0, len) };
    }

    /// Whether `addr` points into this buffer.
    pub(crate) fn contains(&self, addr: *const u8) -> bool {
        let start = self.ptr.as_ptr() as usize;
        let addr = addr as usize;
        addr >= start && addr - start < self.len
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        // `allocate` already validated this layout.
        if let Ok(layout) = Layout::array::<u8>(self.len) {
            // SAFETY: `ptr` was returned by `alloc::alloc` with this exact
            // layout and has not been freed.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}
