//! Arena Layout Calculator.
//!
//! Sizes the single allocation that backs a logger and, once a concrete
//! base address is known, produces the offset table of every page record
//! and buffer. The size includes one block-alignment of slack so the
//! table can always be aligned no matter how the allocator aligned the
//! block itself.

use pagelog_core::ConfigError;
use smallvec::SmallVec;

use crate::config::ArenaConfig;
use crate::record::{HeaderRecord, PageRecord};

/// Page count up to which the offset table lives inline.
pub const INLINE_PAGES: usize = 8;

/// Round `value` up to a multiple of `align` (a power of two).
fn align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    value.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Offsets of one page's record and buffer from the start of the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSlot {
    /// Offset of the encoded [`PageRecord`].
    pub record: usize,
    /// Offset of the first buffer byte.
    pub buffer: usize,
}

/// The offset table for a block at a specific base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Offset of the encoded [`HeaderRecord`].
    pub header: usize,
    /// One slot per page, in index order.
    pub slots: SmallVec<[PageSlot; INLINE_PAGES]>,
}

/// Size and shape of a paged arena.
///
/// Every page block is `record_span + buffer_span` bytes and starts on a
/// `block_align` boundary, so each record and each buffer inherits the
/// alignment of the block that holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaLayout {
    page_amount: usize,
    capacity: usize,
    buffer_align: usize,
    block_align: usize,
    header_span: usize,
    record_span: usize,
    buffer_span: usize,
    block_size: usize,
    total_bytes: usize,
}

impl ArenaLayout {
    /// Compute the layout for a validated config.
    ///
    /// Returns [`ConfigError::LayoutOverflow`] instead of wrapping when the
    /// arena size does not fit in `usize`.
    pub fn compute(config: &ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let overflow = || ConfigError::LayoutOverflow {
            page_amount: config.page_amount,
            page_size: config.page_size,
        };

        let capacity = config.effective_page_size();
        let block_align = PageRecord::ALIGN
            .max(HeaderRecord::ALIGN)
            .max(config.buffer_align);

        let header_span = align_up(HeaderRecord::SIZE, block_align).ok_or_else(overflow)?;
        let record_span = align_up(PageRecord::SIZE, block_align).ok_or_else(overflow)?;
        // One sentinel byte past capacity keeps the trailing null of a full
        // page inside the page's own region.
        let buffer_span = capacity
            .checked_add(1)
            .and_then(|n| align_up(n, block_align))
            .ok_or_else(overflow)?;
        let block_size = record_span
            .checked_add(buffer_span)
            .ok_or_else(overflow)?;
        let total_bytes = block_size
            .checked_mul(config.page_amount)
            .and_then(|n| n.checked_add(header_span))
            .and_then(|n| n.checked_add(block_align))
            .ok_or_else(overflow)?;

        Ok(Self {
            page_amount: config.page_amount,
            capacity,
            buffer_align: config.buffer_align,
            block_align,
            header_span,
            record_span,
            buffer_span,
            block_size,
            total_bytes,
        })
    }

    /// Build the offset table for a block starting at `base_addr`.
    ///
    /// # Panics
    ///
    /// Panics if any page buffer would end beyond `block_len`. That can
    /// only happen if the block is smaller than [`total_bytes`](Self::total_bytes),
    /// i.e. the allocator broke its contract or the size computation is wrong.
    pub fn place(&self, base_addr: usize, block_len: usize) -> Placement {
        let misalign = base_addr % self.block_align;
        let header = if misalign == 0 {
            0
        } else {
            self.block_align - misalign
        };
        let first = header + self.header_span;

        let mut slots = SmallVec::with_capacity(self.page_amount);
        for i in 0..self.page_amount {
            let record = first + i * self.block_size;
            let buffer = record + self.record_span;
            let buffer_end = buffer + self.capacity + 1;
            assert!(
                buffer_end <= block_len,
                "page {i} buffer ends at byte {buffer_end}, beyond the {block_len}-byte arena"
            );
            slots.push(PageSlot { record, buffer });
        }
        Placement { header, slots }
    }

    /// Number of pages.
    pub fn page_amount(&self) -> usize {
        self.page_amount
    }

    /// Capacity of each page in bytes, after the minimum-size coercion.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Alignment guaranteed for every page buffer.
    pub fn buffer_align(&self) -> usize {
        self.buffer_align
    }

    /// Alignment of every page block (and therefore every record).
    pub fn block_align(&self) -> usize {
        self.block_align
    }

    /// Bytes reserved for the header record.
    pub fn header_span(&self) -> usize {
        self.header_span
    }

    /// Bytes from a record's start to its buffer's start.
    pub fn record_span(&self) -> usize {
        self.record_span
    }

    /// Bytes reserved per page buffer, sentinel and padding included.
    pub fn buffer_span(&self) -> usize {
        self.buffer_span
    }

    /// Stride between consecutive page blocks.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Alignment slack added to the total.
    pub fn slack(&self) -> usize {
        self.block_align
    }

    /// Size of the single allocation in bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}

/// Total arena size for `page_amount` pages of `page_size` bytes at the
/// default buffer alignment.
pub fn compute_layout(page_amount: usize, page_size: usize) -> Result<usize, ConfigError> {
    ArenaLayout::compute(&ArenaConfig::new(page_amount, page_size)).map(|l| l.total_bytes())
}
