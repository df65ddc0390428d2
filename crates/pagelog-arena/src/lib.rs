//! Single-allocation paged arena for the pagelog log buffer.
//!
//! One contiguous block, allocated once, is carved into a header and a
//! fixed number of equally sized page blocks. Each page block holds an
//! encoded metadata record followed by its text buffer. Nothing grows,
//! shrinks or moves after initialization.
//!
//! # Architecture
//!
//! ```text
//! block (from a PageAllocator)
//! ├── pad            (0..block_align bytes, base address dependent)
//! ├── HeaderRecord   (page count, page capacity)
//! └── page block × N
//!     ├── PageRecord (type, remaining, capacity, buffer offset)
//!     └── buffer     (capacity + 1 sentinel byte, padded)
//! ```
//!
//! [`ArenaLayout`] sizes the block and computes the offset table;
//! [`PageRing`] owns the block and implements the bounded append
//! write, clear, tagging and lookup operations on top of it.
//!
//! # Safety
//!
//! No `unsafe`. Records are encoded into the block as plain bytes and
//! every page view is a pair of disjoint subslices.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod layout;
pub mod page;
pub mod record;
pub mod ring;

// Public re-exports for the primary API surface.
pub use config::ArenaConfig;
pub use layout::{compute_layout, ArenaLayout, PageSlot, Placement};
pub use page::{Page, PageMut};
pub use ring::PageRing;
