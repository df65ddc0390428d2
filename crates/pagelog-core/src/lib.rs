//! Core types and traits for the pagelog paged log buffer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the page severity tag, the error types shared by every layer, and
//! the [`PageAllocator`] boundary through which the single arena block
//! is obtained and released.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod error;
pub mod kind;

pub use alloc::{PageAllocator, RegionAllocator, SystemAllocator};
pub use error::{AllocError, ConfigError, CreateError, PageError};
pub use kind::PageType;
