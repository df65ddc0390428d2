//! C-compatible status codes.
//!
//! [`PagelogStatus`] covers every failure the C API can report. The write
//! entry points return a non-negative byte count on success and one of
//! these negative codes on failure.

use pagelog::types::{CreateError, PageError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagelogStatus {
    /// Success.
    Ok = 0,
    /// Handle is null, invalid, or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, out of range, or otherwise invalid.
    InvalidArgument = -2,
    /// Page count or page size rejected.
    ConfigError = -3,
    /// The platform allocator could not provide the arena.
    AllocationFailed = -4,
    /// Page index is negative or not below the page count.
    PageNotFound = -5,
    /// The page has no remaining capacity.
    PageFull = -6,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -7,
    /// Writing to the console failed.
    IoError = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&PageError> for PagelogStatus {
    fn from(e: &PageError) -> Self {
        match e {
            PageError::NotFound { .. } => PagelogStatus::PageNotFound,
            PageError::Full { .. } => PagelogStatus::PageFull,
        }
    }
}

impl From<&CreateError> for PagelogStatus {
    fn from(e: &CreateError) -> Self {
        match e {
            CreateError::Config(_) => PagelogStatus::ConfigError,
            CreateError::Alloc(_) => PagelogStatus::AllocationFailed,
        }
    }
}
