//! pagelog: a fixed-capacity, page-structured log buffer.
//!
//! One block is allocated at creation and split into a fixed number of
//! equally sized pages. Each page is an append-only text buffer with a
//! severity tag. Writes that would overflow a page are truncated, never
//! rejected, and never touch memory outside the page. No allocation
//! happens between [`PageLogger::create`] and destruction.
//!
//! # Quick start
//!
//! ```rust
//! use pagelog::prelude::*;
//!
//! let mut logger = PageLogger::create(3, 16).unwrap();
//! assert_eq!(logger.write_line(0, b"hello"), Ok(5));
//! assert_eq!(logger.page(0).unwrap().remaining(), 10);
//!
//! logger.set_page_type(1, PageType::Warning).unwrap();
//! logger.clear_all();
//! assert_eq!(logger.page_type(1), Some(PageType::Default));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `pagelog-arena` | Layout calculator, page ring, page views |
//! | [`types`] | `pagelog-core` | Page tags, errors, allocator boundary |
//! | [`render`] | this crate | Console and memory-map dumps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod logger;
pub mod render;

/// Arena layout and page storage (`pagelog-arena`).
pub use pagelog_arena as arena;
/// Core types, errors and allocators (`pagelog-core`).
pub use pagelog_core as types;

pub use logger::{PageLogger, PageWriter, PrintCommand};

/// Common imports for pagelog users.
pub mod prelude {
    pub use crate::logger::{PageLogger, PageWriter, PrintCommand};
    pub use pagelog_arena::{compute_layout, ArenaConfig, Page};
    pub use pagelog_core::{
        AllocError, ConfigError, CreateError, PageAllocator, PageError, PageType,
        RegionAllocator, SystemAllocator,
    };
}
