//! Logger lifecycle and page operations over the C ABI.
//!
//! Loggers live in the global `LOGGERS` table. Each call holds the table
//! lock for its whole body; a logger is single-writer, so this is the
//! external lock the C side would otherwise have to supply.

use std::ffi::{c_char, CStr};
use std::io;
use std::sync::Mutex;

use pagelog::arena::ArenaConfig;
use pagelog::types::{PageType, SystemAllocator};
use pagelog::PageLogger;

use crate::handle::{HandleTable, NULL_HANDLE};
use crate::status::PagelogStatus;
use crate::types::print_command;

static LOGGERS: Mutex<HandleTable<PageLogger>> = Mutex::new(HandleTable::new());

/// A C page index as a position; negative indices name no page.
fn page_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

fn byte_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Create a logger with `page_amount` pages of `page_size` bytes each.
///
/// On success, writes the logger handle to `handle_out` and returns
/// `PAGELOG_STATUS_OK`. Nothing is allocated when the sizes are rejected.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_create(page_amount: i32, page_size: i32, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return PagelogStatus::InvalidArgument as i32;
        }
        let config = match ArenaConfig::from_signed(i64::from(page_amount), i64::from(page_size)) {
            Ok(c) => c,
            Err(_) => return PagelogStatus::ConfigError as i32,
        };
        let logger = match PageLogger::create_in(config, SystemAllocator) {
            Ok(l) => l,
            Err(e) => return PagelogStatus::from(&e) as i32,
        };

        let mut table = ffi_lock!(LOGGERS);
        let handle = table.insert(logger);
        tracing::debug!(handle, live = table.len(), "ffi logger registered");
        // SAFETY: handle_out is non-null and valid per caller contract.
        unsafe { *handle_out = handle };
        PagelogStatus::Ok as i32
    })
}

/// Destroy a logger, releasing its arena.
///
/// The null handle is accepted as a no-op. A stale handle is also a
/// no-op but reports `PAGELOG_STATUS_INVALID_HANDLE`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_destroy(handle: u64) -> i32 {
    ffi_guard!({
        if handle == NULL_HANDLE {
            return PagelogStatus::Ok as i32;
        }
        match ffi_lock!(LOGGERS).remove(handle) {
            Some(_) => PagelogStatus::Ok as i32,
            None => PagelogStatus::InvalidHandle as i32,
        }
    })
}

/// Borrow the caller's bytes for a save call.
///
/// `size > 0` covers exactly `size` bytes; otherwise `data` must be a
/// NUL-terminated string and its natural length is used.
#[allow(unsafe_code)]
fn caller_bytes<'a>(data: *const c_char, size: i32) -> Option<&'a [u8]> {
    if data.is_null() {
        return None;
    }
    match usize::try_from(size) {
        Ok(n) if n > 0 => {
            // SAFETY: caller guarantees `data` points to at least `size` readable bytes.
            Some(unsafe { std::slice::from_raw_parts(data.cast::<u8>(), n) })
        }
        _ => {
            // SAFETY: caller guarantees `data` is NUL-terminated when `size <= 0`.
            Some(unsafe { CStr::from_ptr(data) }.to_bytes())
        }
    }
}

fn save(handle: u64, data: *const c_char, size: i32, index: i32, line: bool) -> i32 {
    let Some(bytes) = caller_bytes(data, size) else {
        return PagelogStatus::InvalidArgument as i32;
    };
    let mut table = ffi_lock!(LOGGERS);
    let Some(logger) = table.get_mut(handle) else {
        return PagelogStatus::InvalidHandle as i32;
    };
    // The slice already has the requested length.
    let len = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
    let result = if line {
        logger.save_to_page_line(bytes, len, i64::from(index))
    } else {
        logger.save_to_page(bytes, len, i64::from(index))
    };
    match result {
        Ok(n) => byte_count(n),
        Err(e) => PagelogStatus::from(&e) as i32,
    }
}

/// Append `size` bytes of `data` to page `index`.
///
/// `size <= 0` takes `data` as a NUL-terminated string. Returns the bytes
/// written (possibly truncated) or a negative status.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_save_to_page(
    handle: u64,
    data: *const c_char,
    size: i32,
    index: i32,
) -> i32 {
    ffi_guard!({ save(handle, data, size, index, false) })
}

/// As `pagelog_save_to_page`, followed by a newline.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_save_to_page_line(
    handle: u64,
    data: *const c_char,
    size: i32,
    index: i32,
) -> i32 {
    ffi_guard!({ save(handle, data, size, index, true) })
}

/// Retag page `index` with a `PagelogPageType` code.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_set_page_type(handle: u64, index: i32, page_type: i32) -> i32 {
    ffi_guard!({
        let Some(kind) = PageType::from_code(page_type) else {
            return PagelogStatus::InvalidArgument as i32;
        };
        let mut table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get_mut(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        let Some(index) = page_index(index) else {
            return PagelogStatus::PageNotFound as i32;
        };
        match logger.set_page_type(index, kind) {
            Ok(()) => PagelogStatus::Ok as i32,
            Err(e) => PagelogStatus::from(&e) as i32,
        }
    })
}

/// Write the `PagelogPageType` code of page `index` to `type_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_page_type(handle: u64, index: i32, type_out: *mut i32) -> i32 {
    ffi_guard!({
        if type_out.is_null() {
            return PagelogStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        let Some(kind) = page_index(index).and_then(|i| logger.page_type(i)) else {
            return PagelogStatus::PageNotFound as i32;
        };
        // SAFETY: type_out is non-null and valid per caller contract.
        unsafe { *type_out = kind.code() };
        PagelogStatus::Ok as i32
    })
}

/// Copy the contents of page `index` into `buf` as a NUL-terminated string.
///
/// `len_out` receives the content length without the NUL. Returns
/// `PAGELOG_STATUS_BUFFER_TOO_SMALL` if `buf_len` cannot hold the
/// contents plus the NUL; `len_out` still receives the needed length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_read_page(
    handle: u64,
    index: i32,
    buf: *mut u8,
    buf_len: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if buf.is_null() || len_out.is_null() {
            return PagelogStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        let Some(page) = page_index(index).and_then(|i| logger.page(i)) else {
            return PagelogStatus::PageNotFound as i32;
        };
        let contents = page.contents();
        // SAFETY: len_out is non-null and valid per caller contract.
        unsafe { *len_out = contents.len() };
        if contents.len() >= buf_len {
            return PagelogStatus::BufferTooSmall as i32;
        }
        // SAFETY: buf points to at least buf_len writable bytes per caller
        // contract, and contents.len() + 1 <= buf_len.
        let out = unsafe { std::slice::from_raw_parts_mut(buf, contents.len() + 1) };
        out[..contents.len()].copy_from_slice(contents);
        out[contents.len()] = 0;
        PagelogStatus::Ok as i32
    })
}

/// Remaining capacity of page `index` in bytes, or a negative status.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_page_remaining(handle: u64, index: i32) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        match page_index(index).and_then(|i| logger.page(i)) {
            Some(page) => byte_count(page.remaining()),
            None => PagelogStatus::PageNotFound as i32,
        }
    })
}

/// Reset page `index` to empty and untagged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_clear_page(handle: u64, index: i32) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get_mut(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        let Some(index) = page_index(index) else {
            return PagelogStatus::PageNotFound as i32;
        };
        match logger.clear_page(index) {
            Ok(()) => PagelogStatus::Ok as i32,
            Err(e) => PagelogStatus::from(&e) as i32,
        }
    })
}

/// Reset every page to empty and untagged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_clear_all(handle: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get_mut(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        logger.clear_all();
        PagelogStatus::Ok as i32
    })
}

fn io_status(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => PagelogStatus::Ok as i32,
        Err(e) => {
            tracing::warn!(error = %e, "console write failed");
            PagelogStatus::IoError as i32
        }
    }
}

/// Print page `index` to stdout. `command` is a `PagelogPrintCommand`;
/// `PAGELOG_PRINT_COMMAND_FLUSH` clears the page afterwards.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_print_page(handle: u64, index: i32, command: i32) -> i32 {
    ffi_guard!({
        let Some(command) = print_command(command) else {
            return PagelogStatus::InvalidArgument as i32;
        };
        let mut table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get_mut(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        let Some(index) = page_index(index).filter(|&i| logger.page(i).is_some()) else {
            return PagelogStatus::PageNotFound as i32;
        };
        io_status(logger.print_page(index, command, &mut io::stdout().lock()))
    })
}

/// Print every page with its remaining capacity to stdout.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_print_all(handle: u64) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        io_status(logger.print_all(&mut io::stdout().lock()))
    })
}

/// Print the arena memory map with alignment and overlap checks to stdout.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pagelog_debug_dump(handle: u64) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(LOGGERS);
        let Some(logger) = table.get(handle) else {
            return PagelogStatus::InvalidHandle as i32;
        };
        io_status(logger.debug_dump(&mut io::stdout().lock()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PagelogPageType, PagelogPrintCommand};

    fn create(page_amount: i32, page_size: i32) -> u64 {
        let mut h = NULL_HANDLE;
        assert_eq!(
            pagelog_create(page_amount, page_size, &mut h),
            PagelogStatus::Ok as i32
        );
        h
    }

    fn read(h: u64, index: i32) -> Vec<u8> {
        let mut buf = [0u8; 256];
        let mut len = 0usize;
        assert_eq!(
            pagelog_read_page(h, index, buf.as_mut_ptr(), buf.len(), &mut len),
            PagelogStatus::Ok as i32
        );
        assert_eq!(buf[len], 0);
        buf[..len].to_vec()
    }

    #[test]
    fn create_and_destroy() {
        let h = create(3, 16);
        assert_ne!(h, NULL_HANDLE);
        assert_eq!(pagelog_destroy(h), PagelogStatus::Ok as i32);
        assert_eq!(pagelog_destroy(h), PagelogStatus::InvalidHandle as i32);
    }

    #[test]
    fn destroy_null_is_noop() {
        assert_eq!(pagelog_destroy(NULL_HANDLE), PagelogStatus::Ok as i32);
    }

    #[test]
    fn create_rejects_non_positive_sizes() {
        let mut h = NULL_HANDLE;
        let config_error = PagelogStatus::ConfigError as i32;
        assert_eq!(pagelog_create(0, 16, &mut h), config_error);
        assert_eq!(pagelog_create(-3, 16, &mut h), config_error);
        assert_eq!(pagelog_create(3, 0, &mut h), config_error);
        assert_eq!(pagelog_create(3, -1, &mut h), config_error);
        assert_eq!(h, NULL_HANDLE);
    }

    #[test]
    fn create_raises_tiny_page_size_to_minimum() {
        let h = create(3, 1);
        for index in 0..3 {
            assert_eq!(pagelog_page_remaining(h, index), 2);
        }
        assert_eq!(pagelog_destroy(h), PagelogStatus::Ok as i32);
    }

    #[test]
    fn create_null_out_is_invalid_argument() {
        assert_eq!(
            pagelog_create(3, 16, std::ptr::null_mut()),
            PagelogStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn save_sized_and_natural_length() {
        let h = create(2, 32);
        let data = b"hello world\0";
        assert_eq!(pagelog_save_to_page(h, data.as_ptr().cast(), 5, 0), 5);
        assert_eq!(pagelog_save_to_page(h, data.as_ptr().cast(), 0, 1), 11);
        assert_eq!(read(h, 0), b"hello");
        assert_eq!(read(h, 1), b"hello world");
        pagelog_destroy(h);
    }

    #[test]
    fn save_line_consumes_terminator() {
        let h = create(1, 16);
        let data = b"abc\0";
        assert_eq!(pagelog_save_to_page_line(h, data.as_ptr().cast(), 0, 0), 3);
        assert_eq!(pagelog_page_remaining(h, 0), 12);
        assert_eq!(read(h, 0), b"abc\n");
        pagelog_destroy(h);
    }

    #[test]
    fn save_reports_full_and_not_found() {
        let h = create(1, 4);
        let data = b"abcdefgh";
        assert_eq!(pagelog_save_to_page(h, data.as_ptr().cast(), 8, 0), 4);
        assert_eq!(
            pagelog_save_to_page(h, data.as_ptr().cast(), 1, 0),
            PagelogStatus::PageFull as i32
        );
        assert_eq!(
            pagelog_save_to_page(h, data.as_ptr().cast(), 1, 1),
            PagelogStatus::PageNotFound as i32
        );
        assert_eq!(
            pagelog_save_to_page(h, data.as_ptr().cast(), 1, -1),
            PagelogStatus::PageNotFound as i32
        );
        pagelog_destroy(h);
    }

    #[test]
    fn save_null_data_is_invalid_argument() {
        let h = create(1, 8);
        assert_eq!(
            pagelog_save_to_page(h, std::ptr::null(), 3, 0),
            PagelogStatus::InvalidArgument as i32
        );
        pagelog_destroy(h);
    }

    #[test]
    fn stale_handle_is_rejected_everywhere() {
        let h = create(1, 8);
        pagelog_destroy(h);
        let data = b"x";
        let invalid = PagelogStatus::InvalidHandle as i32;
        assert_eq!(pagelog_save_to_page(h, data.as_ptr().cast(), 1, 0), invalid);
        assert_eq!(pagelog_set_page_type(h, 0, 1), invalid);
        assert_eq!(pagelog_page_remaining(h, 0), invalid);
        assert_eq!(pagelog_clear_page(h, 0), invalid);
        assert_eq!(pagelog_clear_all(h), invalid);
        assert_eq!(pagelog_print_all(h), invalid);
    }

    #[test]
    fn page_type_round_trip_and_clear() {
        let h = create(2, 8);
        assert_eq!(
            pagelog_set_page_type(h, 1, PagelogPageType::Warning as i32),
            PagelogStatus::Ok as i32
        );
        let mut code = 0;
        assert_eq!(pagelog_page_type(h, 1, &mut code), PagelogStatus::Ok as i32);
        assert_eq!(code, PagelogPageType::Warning as i32);

        assert_eq!(pagelog_clear_page(h, 1), PagelogStatus::Ok as i32);
        pagelog_page_type(h, 1, &mut code);
        assert_eq!(code, PagelogPageType::Default as i32);

        assert_eq!(
            pagelog_set_page_type(h, 0, 42),
            PagelogStatus::InvalidArgument as i32
        );
        assert_eq!(
            pagelog_page_type(h, 5, &mut code),
            PagelogStatus::PageNotFound as i32
        );
        assert_eq!(
            pagelog_set_page_type(h, -1, PagelogPageType::Info as i32),
            PagelogStatus::PageNotFound as i32
        );
        assert_eq!(pagelog_clear_page(h, -1), PagelogStatus::PageNotFound as i32);
        assert_eq!(pagelog_clear_page(h, 2), PagelogStatus::PageNotFound as i32);
        pagelog_destroy(h);
    }

    #[test]
    fn read_page_reports_small_buffer() {
        let h = create(1, 16);
        let data = b"abcdef";
        pagelog_save_to_page(h, data.as_ptr().cast(), 6, 0);
        let mut buf = [0u8; 6];
        let mut len = 0usize;
        assert_eq!(
            pagelog_read_page(h, 0, buf.as_mut_ptr(), buf.len(), &mut len),
            PagelogStatus::BufferTooSmall as i32
        );
        assert_eq!(len, 6);
        pagelog_destroy(h);
    }

    #[test]
    fn clear_all_restores_capacity() {
        let h = create(2, 8);
        let data = b"abc";
        pagelog_save_to_page(h, data.as_ptr().cast(), 3, 0);
        pagelog_save_to_page(h, data.as_ptr().cast(), 3, 1);
        assert_eq!(pagelog_clear_all(h), PagelogStatus::Ok as i32);
        assert_eq!(pagelog_page_remaining(h, 0), 8);
        assert_eq!(pagelog_page_remaining(h, 1), 8);
        assert!(read(h, 0).is_empty());
        pagelog_destroy(h);
    }

    #[test]
    fn print_page_validates_arguments() {
        let h = create(1, 8);
        assert_eq!(
            pagelog_print_page(h, 0, 9),
            PagelogStatus::InvalidArgument as i32
        );
        assert_eq!(
            pagelog_print_page(h, 3, PagelogPrintCommand::Default as i32),
            PagelogStatus::PageNotFound as i32
        );
        pagelog_destroy(h);
    }

    #[test]
    fn print_page_flush_clears() {
        let h = create(1, 8);
        let data = b"abc";
        pagelog_save_to_page(h, data.as_ptr().cast(), 3, 0);
        assert_eq!(
            pagelog_print_page(h, 0, PagelogPrintCommand::Flush as i32),
            PagelogStatus::Ok as i32
        );
        assert_eq!(pagelog_page_remaining(h, 0), 8);
        assert_eq!(pagelog_debug_dump(h), PagelogStatus::Ok as i32);
        pagelog_destroy(h);
    }
}
