//! Test utilities for SArena development.
//!
//! Provides the [`Record`](fixtures::Record) fixture used by the allocation
//! scenarios, a [`Span`] type for describing handed-out blocks, and
//! [`assert_disjoint`] for checking that no two blocks overlap.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{Record, RECORD_SIZE, SPILL_REGION_CAPACITY};

/// A block handed out by an arena, described by address and length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub addr: usize,
    pub len: usize,
}

impl Span {
    pub fn new(addr: usize, len: usize) -> Self {
        Self { addr, len }
    }

    pub fn from_ptr(ptr: *const u8, len: usize) -> Self {
        Self::new(ptr as usize, len)
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.addr + self.len
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.addr < other.end() && other.addr < self.end()
    }

    /// Byte offset of this span from `base`.
    pub fn offset_from(&self, base: usize) -> usize {
        self.addr - base
    }
}

/// Panic with both spans if any two spans overlap.
///
/// Sorts a copy of `spans`; the input order does not matter.
pub fn assert_disjoint(spans: &[Span]) {
    let mut sorted = spans.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        assert!(
            !pair[0].overlaps(&pair[1]),
            "blocks overlap: {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Deterministic byte pattern of length `len` derived from `seed`.
///
/// Different seeds give different first bytes, so two blocks filled with
/// distinct seeds are distinguishable.
pub fn pattern(seed: u8, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| seed.wrapping_add((i % 251) as u8).wrapping_mul(31))
        .collect()
}
