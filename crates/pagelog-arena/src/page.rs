//! Page views and the bounded append write.
//!
//! A page is a record plus a fixed-capacity buffer inside the arena.
//! [`Page`] is a read-only view; [`PageMut`] owns the exclusive borrow
//! of both halves and implements append, clear and tagging.

use pagelog_core::{PageError, PageType};

use crate::record::PageRecord;

/// Length of the null-terminated text at the start of `buffer`.
fn text_len(buffer: &[u8]) -> usize {
    buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len())
}

/// Read-only view of one page.
#[derive(Clone, Copy, Debug)]
pub struct Page<'a> {
    index: usize,
    record: PageRecord,
    record_addr: usize,
    buffer: &'a [u8],
}

impl<'a> Page<'a> {
    pub(crate) fn new(index: usize, record_bytes: &'a [u8], buffer: &'a [u8]) -> Self {
        Self {
            index,
            record: PageRecord::decode(record_bytes),
            record_addr: record_bytes.as_ptr() as usize,
            buffer,
        }
    }

    /// Position of this page in the logger, from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Severity tag.
    pub fn kind(&self) -> PageType {
        self.record.page_type()
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.record.capacity
    }

    /// Bytes of capacity not yet consumed.
    pub fn remaining(&self) -> usize {
        self.record.remaining
    }

    /// Bytes consumed by appends since the last clear.
    pub fn used(&self) -> usize {
        self.record.capacity - self.record.remaining
    }

    /// Page text up to (not including) its null terminator.
    pub fn contents(&self) -> &'a [u8] {
        let buffer: &'a [u8] = self.buffer;
        &buffer[..text_len(buffer)]
    }

    /// Address of the encoded page record.
    pub fn record_addr(&self) -> usize {
        self.record_addr
    }

    /// Address of the first buffer byte.
    pub fn buffer_addr(&self) -> usize {
        self.buffer.as_ptr() as usize
    }

    /// Address one past the last capacity byte.
    pub fn buffer_end(&self) -> usize {
        self.buffer_addr() + self.record.capacity
    }
}

/// Exclusive view of one page.
#[derive(Debug)]
pub struct PageMut<'a> {
    index: usize,
    record: &'a mut [u8],
    buffer: &'a mut [u8],
}

impl<'a> PageMut<'a> {
    /// `buffer` spans `capacity + 1` bytes; the last one is the sentinel.
    pub(crate) fn new(index: usize, record: &'a mut [u8], buffer: &'a mut [u8]) -> Self {
        Self {
            index,
            record,
            buffer,
        }
    }

    fn load(&self) -> PageRecord {
        PageRecord::decode(self.record)
    }

    /// Position of this page in the logger, from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Severity tag.
    pub fn kind(&self) -> PageType {
        self.load().page_type()
    }

    /// Replace the severity tag. Capacity accounting is untouched.
    pub fn set_kind(&mut self, kind: PageType) {
        let mut record = self.load();
        record.kind = kind.code();
        record.encode(self.record);
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.load().capacity
    }

    /// Bytes of capacity not yet consumed.
    pub fn remaining(&self) -> usize {
        self.load().remaining
    }

    /// Bytes consumed by appends since the last clear.
    pub fn used(&self) -> usize {
        let record = self.load();
        record.capacity - record.remaining
    }

    /// Page text up to (not including) its null terminator.
    pub fn contents(&self) -> &[u8] {
        &self.buffer[..text_len(self.buffer)]
    }

    /// Append `data` at the current write offset.
    ///
    /// Writes are silently truncated to fit: with a terminator the payload
    /// is cut to `remaining - 1` bytes so the terminator always lands,
    /// without one it is cut to `remaining`. A null byte follows the
    /// written region. A terminator of `Some(0)` is treated as `None`.
    ///
    /// Returns the number of payload bytes written, excluding the
    /// terminator. An empty payload into a page with room is `Ok(0)`; a
    /// page with no remaining capacity is [`PageError::Full`].
    pub fn append(&mut self, data: &[u8], terminator: Option<u8>) -> Result<usize, PageError> {
        let mut record = self.load();
        if record.remaining == 0 {
            return Err(PageError::Full { index: self.index });
        }
        let terminator = terminator.filter(|&t| t != 0);

        let offset = record.capacity - record.remaining;
        let room = match terminator {
            Some(_) => record.remaining - 1,
            None => record.remaining,
        };
        let size = data.len().min(room);

        let mut end = offset + size;
        self.buffer[offset..end].copy_from_slice(&data[..size]);
        if let Some(t) = terminator {
            self.buffer[end] = t;
            end += 1;
        }
        self.buffer[end] = 0;

        record.remaining -= end - offset;
        record.encode(self.record);
        Ok(size)
    }

    /// Reset to empty: buffer zeroed, full capacity, tag back to default.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        let record = self.load();
        PageRecord::empty(record.capacity, record.buffer_offset).encode(self.record);
    }

    /// The live buffer, exactly `capacity` bytes.
    ///
    /// Writes through this slice bypass `remaining` accounting. The
    /// sentinel byte past capacity is not exposed, so the page text
    /// always stays null-terminated.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        let capacity = self.load().capacity;
        &mut self.buffer[..capacity]
    }

    /// Consume the view, keeping only the live buffer borrow.
    pub fn into_buffer(self) -> &'a mut [u8] {
        let capacity = PageRecord::decode(self.record).capacity;
        let buffer = self.buffer;
        &mut buffer[..capacity]
    }
}
