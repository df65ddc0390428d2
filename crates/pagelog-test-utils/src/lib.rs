//! Test utilities and fake allocators for pagelog development.
//!
//! Each allocator implements [`PageAllocator`] so code under test can be
//! handed a heap that counts, refuses, or misaligns its blocks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::ops::{Deref, DerefMut};

use pagelog_core::{AllocError, PageAllocator, SystemAllocator};

/// Heap allocator that records every allocate and release.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    pub allocations: usize,
    pub releases: usize,
    pub live_bytes: usize,
    pub last_request: Option<usize>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.allocations - self.releases
    }
}

impl PageAllocator for CountingAllocator {
    type Block = Box<[u8]>;

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        self.last_request = Some(bytes);
        let block = SystemAllocator.allocate(bytes)?;
        self.allocations += 1;
        self.live_bytes += block.len();
        Ok(block)
    }

    fn release(&mut self, block: Self::Block) {
        self.releases += 1;
        self.live_bytes -= block.len();
    }
}

/// Allocator that refuses any request above a fixed byte budget.
#[derive(Debug)]
pub struct BudgetAllocator {
    budget: usize,
}

impl BudgetAllocator {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    /// An allocator that refuses everything.
    pub fn exhausted() -> Self {
        Self::new(0)
    }
}

impl PageAllocator for BudgetAllocator {
    type Block = Box<[u8]>;

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        if bytes > self.budget {
            return Err(AllocError::OutOfMemory { requested: bytes });
        }
        self.budget -= bytes;
        SystemAllocator.allocate(bytes)
    }

    fn release(&mut self, block: Self::Block) {
        self.budget += block.len();
    }
}

/// A block whose visible start is offset into its backing storage.
#[derive(Debug)]
pub struct SkewedBlock {
    data: Box<[u8]>,
    skew: usize,
}

impl Deref for SkewedBlock {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data[self.skew..]
    }
}

impl DerefMut for SkewedBlock {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.skew..]
    }
}

/// Allocator whose blocks start `skew` bytes past the heap's alignment,
/// optionally prefilled with a garbage byte.
#[derive(Debug)]
pub struct SkewedAllocator {
    skew: usize,
    fill: u8,
}

impl SkewedAllocator {
    pub fn new(skew: usize) -> Self {
        Self { skew, fill: 0 }
    }

    pub fn with_fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }
}

impl PageAllocator for SkewedAllocator {
    type Block = SkewedBlock;

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        let total = bytes
            .checked_add(self.skew)
            .ok_or(AllocError::OutOfMemory { requested: bytes })?;
        let mut data = SystemAllocator.allocate(total)?;
        data.fill(self.fill);
        Ok(SkewedBlock {
            data,
            skew: self.skew,
        })
    }

    fn release(&mut self, block: Self::Block) {
        drop(block);
    }
}
