//! Page Ring Manager.
//!
//! [`PageRing`] owns the arena block and the offset table computed for
//! it. Pages are addressed by index through the table in O(1); the
//! sequence order is the creation order and never changes.

use std::ops::DerefMut;

use pagelog_core::{ConfigError, PageError, PageType};

use crate::config::ArenaConfig;
use crate::layout::{ArenaLayout, PageSlot, Placement};
use crate::page::{Page, PageMut};
use crate::record::{HeaderRecord, PageRecord};

/// A fixed sequence of pages carved out of one block.
///
/// The ring performs no locking. Concurrent use from several execution
/// contexts needs one external lock per ring.
pub struct PageRing<B> {
    block: B,
    layout: ArenaLayout,
    placement: Placement,
}

impl<B: DerefMut<Target = [u8]>> PageRing<B> {
    /// Compute the layout for `config` and initialise `block` with it.
    pub fn new(block: B, config: &ArenaConfig) -> Result<Self, ConfigError> {
        let layout = ArenaLayout::compute(config)?;
        Ok(Self::init(block, layout))
    }

    /// Carve `block` into the pages described by `layout`.
    ///
    /// Every page starts empty and untagged. The block's prior contents
    /// do not matter.
    ///
    /// # Panics
    ///
    /// Panics if the block is too small to contain every page buffer.
    pub fn init(mut block: B, layout: ArenaLayout) -> Self {
        let bytes: &mut [u8] = &mut block;
        let placement = layout.place(bytes.as_ptr() as usize, bytes.len());
        let capacity = layout.capacity();

        let header = HeaderRecord {
            page_amount: layout.page_amount(),
            page_size: capacity,
        };
        header.encode(&mut bytes[placement.header..placement.header + HeaderRecord::SIZE]);

        for slot in &placement.slots {
            PageRecord::empty(capacity, slot.buffer)
                .encode(&mut bytes[slot.record..slot.record + PageRecord::SIZE]);
            let buffer = &mut bytes[slot.buffer..slot.buffer + capacity + 1];
            buffer[0] = 0;
            buffer[1] = 0;
            buffer[capacity] = 0;
        }

        Self {
            block,
            layout,
            placement,
        }
    }

    fn slot(&self, index: usize) -> Option<PageSlot> {
        self.placement.slots.get(index).copied()
    }

    /// The error reported for an index this ring does not hold.
    pub fn not_found(&self, index: usize) -> PageError {
        PageError::NotFound {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            page_amount: self.page_amount(),
        }
    }

    /// Map a signed index onto a page position.
    ///
    /// Negative and out-of-range indices are [`PageError::NotFound`].
    pub fn resolve(&self, index: i64) -> Result<usize, PageError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.page_amount())
            .ok_or(PageError::NotFound {
                index,
                page_amount: self.page_amount(),
            })
    }

    /// Read-only view of page `index`.
    pub fn page_at(&self, index: usize) -> Option<Page<'_>> {
        let slot = self.slot(index)?;
        let bytes: &[u8] = &self.block;
        let capacity = self.layout.capacity();
        Some(Page::new(
            index,
            &bytes[slot.record..slot.record + PageRecord::SIZE],
            &bytes[slot.buffer..slot.buffer + capacity + 1],
        ))
    }

    /// Exclusive view of page `index`.
    pub fn page_at_mut(&mut self, index: usize) -> Option<PageMut<'_>> {
        let slot = self.slot(index)?;
        let capacity = self.layout.capacity();
        let bytes: &mut [u8] = &mut self.block;
        // Records always precede their buffer.
        let (head, tail) = bytes.split_at_mut(slot.buffer);
        Some(PageMut::new(
            index,
            &mut head[slot.record..slot.record + PageRecord::SIZE],
            &mut tail[..capacity + 1],
        ))
    }

    /// All pages in index order.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> + '_ {
        (0..self.page_amount()).filter_map(move |i| self.page_at(i))
    }

    /// Bounded append to page `index`. See [`PageMut::append`].
    pub fn write(
        &mut self,
        index: usize,
        data: &[u8],
        terminator: Option<u8>,
    ) -> Result<usize, PageError> {
        let not_found = self.not_found(index);
        let mut page = self.page_at_mut(index).ok_or(not_found)?;
        let written = page.append(data, terminator)?;
        if written < data.len() {
            tracing::trace!(
                page = index,
                requested = data.len(),
                written,
                remaining = page.remaining(),
                "page write truncated"
            );
        }
        Ok(written)
    }

    /// Severity tag of page `index`.
    pub fn page_type(&self, index: usize) -> Option<PageType> {
        self.page_at(index).map(|p| p.kind())
    }

    /// Retag page `index`.
    pub fn set_type(&mut self, index: usize, kind: PageType) -> Result<(), PageError> {
        let not_found = self.not_found(index);
        self.page_at_mut(index).ok_or(not_found)?.set_kind(kind);
        Ok(())
    }

    /// The live buffer of page `index`, exactly `capacity` bytes.
    ///
    /// Writes through it bypass `remaining` accounting.
    pub fn buffer_of(&mut self, index: usize) -> Option<&mut [u8]> {
        self.page_at_mut(index).map(PageMut::into_buffer)
    }

    /// Reset page `index` to empty and untagged.
    pub fn clear_page(&mut self, index: usize) -> Result<(), PageError> {
        let not_found = self.not_found(index);
        self.page_at_mut(index).ok_or(not_found)?.clear();
        Ok(())
    }

    /// Reset every page to empty and untagged.
    pub fn clear_all(&mut self) {
        for index in 0..self.page_amount() {
            if let Some(mut page) = self.page_at_mut(index) {
                page.clear();
            }
        }
    }

    /// The header record as stored in the block.
    pub fn header(&self) -> HeaderRecord {
        let bytes: &[u8] = &self.block;
        let at = self.placement.header;
        HeaderRecord::decode(&bytes[at..at + HeaderRecord::SIZE])
    }

    /// Number of pages.
    pub fn page_amount(&self) -> usize {
        self.layout.page_amount()
    }

    /// Capacity of every page in bytes.
    pub fn page_size(&self) -> usize {
        self.layout.capacity()
    }

    /// The layout this ring was initialised with.
    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// Address of the first byte of the block.
    pub fn base_addr(&self) -> usize {
        self.block.as_ptr() as usize
    }

    /// Length of the block in bytes.
    pub fn block_len(&self) -> usize {
        self.block.len()
    }

    /// Give the block back, ending the ring.
    pub fn into_block(self) -> B {
        self.block
    }
}
