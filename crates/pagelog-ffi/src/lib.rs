//! C FFI bindings for the pagelog paged log buffer.
//!
//! Exposes a C-compatible API for firmware written in C. Loggers live in
//! a generation-checked handle table, so a destroyed or never-issued
//! handle is reported as [`PagelogStatus::InvalidHandle`] instead of
//! dereferencing freed memory. Handle `0` is never issued and acts as
//! the null handle.
//!
//! Every entry point catches panics and reports them as
//! [`PagelogStatus::Panicked`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into `PagelogStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => $crate::status::PagelogStatus::Panicked as i32,
        }
    };
}

/// Lock a mutex inside `ffi_guard!`, returning `InternalError` if poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::PagelogStatus::InternalError as i32,
        }
    };
}

mod handle;
pub mod logger;
pub mod status;
pub mod types;

pub use status::PagelogStatus;
pub use types::{PagelogPageType, PagelogPrintCommand};
