//! Metadata records stored inside the arena block.
//!
//! Records are `#[repr(C)]` value types whose size and alignment drive
//! the layout. They are encoded into the block field by field in native
//! byte order, so the arena can be inspected with a debugger as if the
//! structs were placed there directly.

use std::mem::{align_of, offset_of, size_of};

use pagelog_core::PageType;

const WORD: usize = size_of::<usize>();

fn read_word(bytes: &[u8], at: usize) -> usize {
    let mut raw = [0u8; WORD];
    raw.copy_from_slice(&bytes[at..at + WORD]);
    usize::from_ne_bytes(raw)
}

fn write_word(bytes: &mut [u8], at: usize, value: usize) {
    bytes[at..at + WORD].copy_from_slice(&value.to_ne_bytes());
}

/// Arena header: the logger-wide parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderRecord {
    /// Number of pages in the arena.
    pub page_amount: usize,
    /// Capacity of every page in bytes.
    pub page_size: usize,
}

impl HeaderRecord {
    /// Encoded size in bytes.
    pub const SIZE: usize = size_of::<Self>();

    /// Required alignment of the encoded record.
    pub const ALIGN: usize = align_of::<Self>();

    /// Decode from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Self {
        Self {
            page_amount: read_word(bytes, offset_of!(Self, page_amount)),
            page_size: read_word(bytes, offset_of!(Self, page_size)),
        }
    }

    /// Encode into the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    pub fn encode(&self, bytes: &mut [u8]) {
        write_word(bytes, offset_of!(Self, page_amount), self.page_amount);
        write_word(bytes, offset_of!(Self, page_size), self.page_size);
    }
}

/// Per-page metadata record, placed immediately before the page buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRecord {
    /// Bytes of capacity not yet consumed.
    pub remaining: usize,
    /// Total buffer capacity in bytes.
    pub capacity: usize,
    /// Offset of the page buffer from the start of the block.
    pub buffer_offset: usize,
    /// Severity tag code, see [`PageType::code`].
    pub kind: i32,
}

impl PageRecord {
    /// Encoded size in bytes.
    pub const SIZE: usize = size_of::<Self>();

    /// Required alignment of the encoded record.
    pub const ALIGN: usize = align_of::<Self>();

    /// A freshly initialised record: empty, untagged.
    pub fn empty(capacity: usize, buffer_offset: usize) -> Self {
        Self {
            remaining: capacity,
            capacity,
            buffer_offset,
            kind: PageType::Default.code(),
        }
    }

    /// Decode from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut kind = [0u8; size_of::<i32>()];
        let at = offset_of!(Self, kind);
        kind.copy_from_slice(&bytes[at..at + size_of::<i32>()]);
        Self {
            remaining: read_word(bytes, offset_of!(Self, remaining)),
            capacity: read_word(bytes, offset_of!(Self, capacity)),
            buffer_offset: read_word(bytes, offset_of!(Self, buffer_offset)),
            kind: i32::from_ne_bytes(kind),
        }
    }

    /// Encode into the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    pub fn encode(&self, bytes: &mut [u8]) {
        write_word(bytes, offset_of!(Self, remaining), self.remaining);
        write_word(bytes, offset_of!(Self, capacity), self.capacity);
        write_word(bytes, offset_of!(Self, buffer_offset), self.buffer_offset);
        let at = offset_of!(Self, kind);
        bytes[at..at + size_of::<i32>()].copy_from_slice(&self.kind.to_ne_bytes());
    }

    /// The decoded severity tag.
    ///
    /// # Panics
    ///
    /// Panics if the stored code is unknown. Only this crate writes
    /// records, so an unknown code means the block was corrupted.
    pub fn page_type(&self) -> PageType {
        match PageType::from_code(self.kind) {
            Some(kind) => kind,
            None => panic!("corrupted page record: unknown type code {}", self.kind),
        }
    }
}
