//! A thread-safe region-based bump allocator.
//!
//! An [`Arena`] hands out variable-sized, unaligned byte blocks by bumping a
//! cursor inside fixed-capacity regions. Blocks are never freed one by one:
//! the whole arena is reclaimed at once, either by [`Arena::rewind`] (keep
//! every region, start refilling from the first) or by [`Arena::reset`]
//! (release all but the first region). Typical use is one arena per request
//! or per frame.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── ArenaConfig (region capacity, region limit, reset policy)
//! └── Mutex<ArenaState>
//!     ├── RegionChain → VecDeque<Region>
//!     │   └── Region (RawBuffer of region_capacity bytes + used counter)
//!     └── rewind cursor: Option<usize>
//! ```
//!
//! # Allocation modes
//!
//! - **Growth:** a request that does not fit in the tail appends a region.
//! - **Rewind:** after `rewind()` on a multi-region arena, a request that
//!   does not fit moves the cursor to the next existing region. Reaching the
//!   tail switches back to growth.
//!
//! Choose `region_capacity` much larger than typical requests: space left
//! at the end of a region that a request skipped past is not reused until
//! the next rewind or reset.
//!
//! # Safety
//!
//! All `unsafe` code is confined to the private `raw` module. Returned
//! blocks are `NonNull<u8>`; reading or writing them, and not using them
//! after the next rewind, reset or drop, is up to the caller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod arena;
mod chain;
pub mod config;
pub mod error;
mod raw;
mod region;

// Public re-exports for the primary API surface.
pub use arena::{AllocMode, Arena, ArenaStats};
pub use config::{ArenaConfig, ResetPolicy};
pub use error::{ArenaError, ArgumentError};
