//! Error types for the pagelog paged log buffer.
//!
//! Organized by failure class: configuration (rejected before any
//! allocation), allocation (the platform allocator refused the block),
//! and addressing/capacity (per-call, fully recoverable). Layout
//! invariant violations are not represented here; they panic.

use std::error::Error;
use std::fmt;

/// Invalid construction parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Page count was zero or negative.
    InvalidPageAmount {
        /// The rejected value.
        value: i64,
    },
    /// Page size was zero or negative.
    InvalidPageSize {
        /// The rejected value.
        value: i64,
    },
    /// Buffer alignment is not a power of two or exceeds the supported maximum.
    InvalidBufferAlign {
        /// The rejected alignment.
        align: usize,
    },
    /// The arena size does not fit in `usize`.
    LayoutOverflow {
        /// Requested page count.
        page_amount: usize,
        /// Requested page size in bytes.
        page_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPageAmount { value } => {
                write!(f, "page amount must be positive, got {value}")
            }
            Self::InvalidPageSize { value } => {
                write!(f, "page size must be positive, got {value}")
            }
            Self::InvalidBufferAlign { align } => {
                write!(f, "buffer alignment {align} is not a supported power of two")
            }
            Self::LayoutOverflow {
                page_amount,
                page_size,
            } => {
                write!(
                    f,
                    "arena size overflows usize: {page_amount} pages of {page_size} bytes"
                )
            }
        }
    }
}

impl Error for ConfigError {}

/// Failures reported by a [`PageAllocator`](crate::PageAllocator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator could not satisfy a request of this many bytes.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// A single-use allocator has already handed out its region.
    Exhausted,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "allocator could not provide {requested} bytes")
            }
            Self::Exhausted => write!(f, "allocator region already in use"),
        }
    }
}

impl Error for AllocError {}

/// Logger construction failed. No partial logger is ever returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateError {
    /// Parameters were rejected before allocation.
    Config(ConfigError),
    /// The allocator refused the arena block.
    Alloc(AllocError),
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Alloc(e) => write!(f, "alloc: {e}"),
        }
    }
}

impl Error for CreateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Alloc(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CreateError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AllocError> for CreateError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}

/// Per-call page errors. No state is mutated when one is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageError {
    /// The index does not name a page of this logger.
    NotFound {
        /// The requested index.
        index: i64,
        /// Number of pages in the logger.
        page_amount: usize,
    },
    /// The page has no remaining capacity.
    Full {
        /// Index of the full page.
        index: usize,
    },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { index, page_amount } => {
                write!(f, "page {index} not found (logger has {page_amount} pages)")
            }
            Self::Full { index } => write!(f, "page {index} has no remaining capacity"),
        }
    }
}

impl Error for PageError {}
