//! The platform allocator boundary.
//!
//! A logger obtains exactly one block at construction and releases it
//! exactly once at destruction. Everything in between works inside that
//! block. The allocator is supplied at construction time, so the same
//! logger code runs over the heap, a static region, or a test fake.

use std::ops::DerefMut;

use crate::error::AllocError;

/// Source of the single arena block backing a logger.
///
/// # Contract
///
/// The bytes behind a `Block` must keep a stable address for as long
/// as the block is owned (boxed slices, vectors and borrowed regions all
/// qualify; inline arrays do not). The arena layout is computed against
/// the block's base address once, at initialization.
pub trait PageAllocator {
    /// Owned handle to an allocated region.
    type Block: DerefMut<Target = [u8]>;

    /// Allocate a region of at least `bytes` bytes.
    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError>;

    /// Return a region previously handed out by [`allocate`](Self::allocate).
    fn release(&mut self, block: Self::Block);
}

impl<A: PageAllocator + ?Sized> PageAllocator for &mut A {
    type Block = A::Block;

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        (**self).allocate(bytes)
    }

    fn release(&mut self, block: Self::Block) {
        (**self).release(block)
    }
}

/// General-purpose heap allocator.
///
/// Allocation is fallible: exhaustion is reported as
/// [`AllocError::OutOfMemory`] instead of aborting the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl PageAllocator for SystemAllocator {
    type Block = Box<[u8]>;

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| AllocError::OutOfMemory { requested: bytes })?;
        data.resize(bytes, 0);
        Ok(data.into_boxed_slice())
    }

    fn release(&mut self, block: Self::Block) {
        drop(block);
    }
}

/// Hands out one caller-provided memory region.
///
/// Intended for targets without a heap: the region is typically a
/// `static mut` buffer or a linker-placed DMA-capable section. The whole
/// region is lent on `allocate` and returned on `release`, after which it
/// may be handed out again.
#[derive(Debug)]
pub struct RegionAllocator<'a> {
    region: Option<&'a mut [u8]>,
}

impl<'a> RegionAllocator<'a> {
    /// Wrap a region for single-logger use.
    pub fn new(region: &'a mut [u8]) -> Self {
        Self {
            region: Some(region),
        }
    }

    /// Whether the region is currently available.
    pub fn is_available(&self) -> bool {
        self.region.is_some()
    }

    /// Size of the wrapped region, if it is not lent out.
    pub fn available_bytes(&self) -> Option<usize> {
        self.region.as_ref().map(|r| r.len())
    }
}

impl<'a> PageAllocator for RegionAllocator<'a> {
    type Block = &'a mut [u8];

    fn allocate(&mut self, bytes: usize) -> Result<Self::Block, AllocError> {
        let region = self.region.take().ok_or(AllocError::Exhausted)?;
        if region.len() < bytes {
            self.region = Some(region);
            return Err(AllocError::OutOfMemory { requested: bytes });
        }
        Ok(region)
    }

    fn release(&mut self, block: Self::Block) {
        self.region = Some(block);
    }
}
