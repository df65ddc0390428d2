//! The logger handle.
//!
//! [`PageLogger`] ties the three pieces together: it sizes the arena,
//! obtains the single block from its [`PageAllocator`], initialises the
//! page ring over it, and hands the block back to the same allocator
//! exactly once when it is destroyed or dropped.
//!
//! Pages are addressed by `usize`. Only the `save_*` pair takes the
//! signed size and index of the C interface.

use std::fmt;
use std::io;

use pagelog_arena::{ArenaConfig, ArenaLayout, Page, PageMut, PageRing};
use pagelog_core::{CreateError, PageAllocator, PageError, PageType, SystemAllocator};

use crate::render;

/// Terminator appended by the line-oriented writes.
pub const LINE_TERMINATOR: u8 = b'\n';

/// What to do with a page after printing it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintCommand {
    /// Print only.
    #[default]
    Default,
    /// Print, then clear the page.
    Flush,
}

/// Length of `data` up to its first null byte.
fn natural_len(data: &[u8]) -> usize {
    data.iter().position(|&b| b == 0).unwrap_or(data.len())
}

/// The payload selected by a C-style size argument.
///
/// `size <= 0` means the natural length. A positive size is clamped to
/// the slice so it can never read past the caller's data.
fn sized_payload(data: &[u8], size: i64) -> &[u8] {
    match usize::try_from(size) {
        Ok(n) if n > 0 => &data[..n.min(data.len())],
        _ => &data[..natural_len(data)],
    }
}

/// A fixed set of log pages inside one allocation.
///
/// Single-writer: the logger performs no locking. Share it between
/// execution contexts only behind an external lock.
pub struct PageLogger<A: PageAllocator = SystemAllocator> {
    /// `None` only while dropping.
    ring: Option<PageRing<A::Block>>,
    allocator: A,
}

impl PageLogger<SystemAllocator> {
    /// Create a heap-backed logger with `page_amount` pages of `page_size` bytes.
    pub fn create(page_amount: usize, page_size: usize) -> Result<Self, CreateError> {
        Self::create_in(ArenaConfig::new(page_amount, page_size), SystemAllocator)
    }
}

impl<A: PageAllocator> PageLogger<A> {
    /// Create a logger from `config`, obtaining its block from `allocator`.
    ///
    /// Fails before allocating if the config is invalid, and without
    /// leaking anything if the allocator refuses the block.
    pub fn create_in(config: ArenaConfig, mut allocator: A) -> Result<Self, CreateError> {
        let layout = ArenaLayout::compute(&config)?;
        let block = allocator
            .allocate(layout.total_bytes())
            .inspect_err(|e| {
                tracing::warn!(
                    total_bytes = layout.total_bytes(),
                    error = %e,
                    "arena allocation failed"
                );
            })?;
        let ring = PageRing::init(block, layout);
        tracing::debug!(
            page_amount = layout.page_amount(),
            page_size = layout.capacity(),
            total_bytes = layout.total_bytes(),
            "page logger created"
        );
        Ok(Self {
            ring: Some(ring),
            allocator,
        })
    }

    /// Release the arena. Equivalent to dropping the logger.
    pub fn destroy(self) {
        drop(self);
    }

    fn ring(&self) -> &PageRing<A::Block> {
        self.ring.as_ref().expect("page ring is present until drop")
    }

    fn ring_mut(&mut self) -> &mut PageRing<A::Block> {
        self.ring.as_mut().expect("page ring is present until drop")
    }

    /// Append `data` to page `index` as given.
    ///
    /// Returns the bytes written, which is less than `data.len()` when
    /// the page did not have room.
    pub fn write(&mut self, index: usize, data: &[u8]) -> Result<usize, PageError> {
        self.ring_mut().write(index, data, None)
    }

    /// Append `data` followed by a newline to page `index`.
    pub fn write_line(&mut self, index: usize, data: &[u8]) -> Result<usize, PageError> {
        self.ring_mut().write(index, data, Some(LINE_TERMINATOR))
    }

    /// Append a string to page `index`.
    pub fn write_str(&mut self, index: usize, text: &str) -> Result<usize, PageError> {
        self.write(index, text.as_bytes())
    }

    /// Append with C-style arguments: `size <= 0` uses the length of
    /// `data` up to its first null byte; negative indices are not found.
    pub fn save_to_page(&mut self, data: &[u8], size: i64, index: i64) -> Result<usize, PageError> {
        let index = self.ring().resolve(index)?;
        self.ring_mut().write(index, sized_payload(data, size), None)
    }

    /// As [`save_to_page`](Self::save_to_page), followed by a newline.
    pub fn save_to_page_line(
        &mut self,
        data: &[u8],
        size: i64,
        index: i64,
    ) -> Result<usize, PageError> {
        let index = self.ring().resolve(index)?;
        self.ring_mut()
            .write(index, sized_payload(data, size), Some(LINE_TERMINATOR))
    }

    /// A [`fmt::Write`] sink over page `index`, for `write!` without
    /// intermediate allocation.
    pub fn page_writer(&mut self, index: usize) -> Option<PageWriter<'_>> {
        self.ring_mut()
            .page_at_mut(index)
            .map(|page| PageWriter { page, written: 0 })
    }

    /// Retag page `index`.
    pub fn set_page_type(&mut self, index: usize, kind: PageType) -> Result<(), PageError> {
        self.ring_mut().set_type(index, kind)
    }

    /// Severity tag of page `index`.
    pub fn page_type(&self, index: usize) -> Option<PageType> {
        self.ring().page_type(index)
    }

    /// The live buffer of page `index`. Writes through it bypass
    /// capacity accounting.
    pub fn page_buffer(&mut self, index: usize) -> Option<&mut [u8]> {
        self.ring_mut().buffer_of(index)
    }

    /// Read-only view of page `index`.
    pub fn page(&self, index: usize) -> Option<Page<'_>> {
        self.ring().page_at(index)
    }

    /// All pages in index order.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> + '_ {
        self.ring().pages()
    }

    /// Reset page `index` to empty and untagged.
    pub fn clear_page(&mut self, index: usize) -> Result<(), PageError> {
        self.ring_mut().clear_page(index)
    }

    /// Reset every page to empty and untagged.
    pub fn clear_all(&mut self) {
        self.ring_mut().clear_all();
        tracing::trace!("all pages cleared");
    }

    /// Print page `index` as `Page {index}: {text}`.
    ///
    /// With [`PrintCommand::Flush`] the page is cleared after printing.
    /// An unknown index is reported as [`io::ErrorKind::InvalidInput`].
    pub fn print_page<W: io::Write>(
        &mut self,
        index: usize,
        command: PrintCommand,
        out: &mut W,
    ) -> io::Result<()> {
        let page = self.ring().page_at(index).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, self.ring().not_found(index))
        })?;
        render::write_page_line(out, &page)?;
        if command == PrintCommand::Flush {
            self.ring_mut()
                .clear_page(index)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        Ok(())
    }

    /// Print every page with its remaining capacity.
    pub fn print_all<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        render::write_all_pages(out, self.ring())
    }

    /// Print the arena memory map with alignment and overlap checks.
    pub fn debug_dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        render::write_memory_map(out, self.ring())
    }

    /// Number of pages.
    pub fn page_amount(&self) -> usize {
        self.ring().page_amount()
    }

    /// Capacity of every page in bytes.
    pub fn page_size(&self) -> usize {
        self.ring().page_size()
    }

    /// The arena layout.
    pub fn layout(&self) -> &ArenaLayout {
        self.ring().layout()
    }

    /// The page ring, for read-only inspection.
    pub fn ring_ref(&self) -> &PageRing<A::Block> {
        self.ring()
    }

    /// The allocator that owns this logger's block.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<A: PageAllocator> Drop for PageLogger<A> {
    fn drop(&mut self) {
        if let Some(ring) = self.ring.take() {
            let total_bytes = ring.block_len();
            self.allocator.release(ring.into_block());
            tracing::debug!(total_bytes, "page logger destroyed");
        }
    }
}

impl<A: PageAllocator> fmt::Debug for PageLogger<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLogger")
            .field("page_amount", &self.page_amount())
            .field("page_size", &self.page_size())
            .field("total_bytes", &self.layout().total_bytes())
            .finish()
    }
}

/// Formatting sink over one page.
///
/// Output is truncated like any other page write. Once the page is full
/// further writes fail with [`fmt::Error`].
#[derive(Debug)]
pub struct PageWriter<'a> {
    page: PageMut<'a>,
    written: usize,
}

impl PageWriter<'_> {
    /// Payload bytes written through this sink so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Append the line terminator.
    pub fn end_line(&mut self) -> Result<(), PageError> {
        self.page.append(&[], Some(LINE_TERMINATOR)).map(|_| ())
    }
}

impl fmt::Write for PageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let n = self.page.append(s.as_bytes(), None).map_err(|_| fmt::Error)?;
        if n < s.len() {
            tracing::trace!(
                page = self.page.index(),
                requested = s.len(),
                written = n,
                remaining = self.page.remaining(),
                "page write truncated"
            );
        }
        self.written += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    use pagelog_core::{AllocError, ConfigError};
    use pagelog_test_utils::{BudgetAllocator, CountingAllocator};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn natural_length_stops_at_null() {
        assert_eq!(natural_len(b"abc\0def"), 3);
        assert_eq!(natural_len(b"abc"), 3);
        assert_eq!(natural_len(b""), 0);
    }

    #[test]
    fn sized_payload_follows_c_contract() {
        assert_eq!(sized_payload(b"hello\0junk", 0), b"hello");
        assert_eq!(sized_payload(b"hello\0junk", -7), b"hello");
        assert_eq!(sized_payload(b"hello", 3), b"hel");
        assert_eq!(sized_payload(b"hello", 99), b"hello");
        assert_eq!(sized_payload(b"a\0b", 3), b"a\0b");
    }

    #[test]
    fn create_rejects_invalid_parameters() {
        assert_eq!(
            PageLogger::create(0, 16).err(),
            Some(CreateError::Config(ConfigError::InvalidPageAmount { value: 0 }))
        );
        assert_eq!(
            PageLogger::create(3, 0).err(),
            Some(CreateError::Config(ConfigError::InvalidPageSize { value: 0 }))
        );
    }

    #[test]
    fn create_reports_allocator_refusal() {
        let result = PageLogger::create_in(ArenaConfig::new(4, 64), BudgetAllocator::exhausted());
        assert!(matches!(
            result,
            Err(CreateError::Alloc(AllocError::OutOfMemory { .. }))
        ));
    }

    #[test]
    fn requests_exactly_the_computed_size() {
        let mut alloc = CountingAllocator::new();
        let logger = PageLogger::create_in(ArenaConfig::new(6, 1024), &mut alloc).unwrap();
        let total = logger.layout().total_bytes();
        drop(logger);
        assert_eq!(alloc.last_request, Some(total));
    }

    #[test]
    fn block_is_released_exactly_once() {
        let mut alloc = CountingAllocator::new();
        let logger = PageLogger::create_in(ArenaConfig::new(2, 8), &mut alloc).unwrap();
        logger.destroy();
        assert_eq!(alloc.allocations, 1);
        assert_eq!(alloc.releases, 1);
        assert_eq!(alloc.live_bytes, 0);
    }

    #[test]
    fn out_of_range_indices_are_not_found() {
        let mut logger = PageLogger::create(2, 8).unwrap();
        let nf = |index: i64| PageError::NotFound {
            index,
            page_amount: 2,
        };
        assert_eq!(logger.save_to_page(b"x", 1, -1), Err(nf(-1)));
        assert_eq!(logger.save_to_page_line(b"x", 1, -1), Err(nf(-1)));
        assert_eq!(logger.save_to_page(b"x", 0, i64::MIN), Err(nf(i64::MIN)));
        assert_eq!(logger.save_to_page(b"x", 1, 2), Err(nf(2)));
        assert_eq!(logger.set_page_type(2, PageType::Info), Err(nf(2)));
        assert_eq!(logger.clear_page(2), Err(nf(2)));
        assert!(logger.pages().all(|p| p.remaining() == 8));
    }

    #[test]
    fn save_to_page_line_appends_newline() {
        let mut logger = PageLogger::create(1, 32).unwrap();
        assert_eq!(logger.save_to_page_line(b"boot ok\0", 0, 0), Ok(7));
        assert_eq!(logger.page(0).unwrap().contents(), b"boot ok\n");
        assert_eq!(logger.page(0).unwrap().remaining(), 24);
    }

    #[test]
    fn page_writer_formats_in_place() {
        let mut logger = PageLogger::create(1, 32).unwrap();
        {
            let mut w = logger.page_writer(0).unwrap();
            write!(w, "temp={} rpm={}", 21, 900).unwrap();
            w.end_line().unwrap();
            assert_eq!(w.written(), 15);
        }
        assert_eq!(logger.page(0).unwrap().contents(), b"temp=21 rpm=900\n");
    }

    #[test]
    fn page_writer_errors_once_full() {
        let mut logger = PageLogger::create(1, 4).unwrap();
        let mut w = logger.page_writer(0).unwrap();
        assert!(write!(w, "abcdef").is_ok());
        assert!(write!(w, "g").is_err());
        assert_eq!(w.written(), 4);
    }

    #[test]
    fn page_writer_traces_truncation() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(CaptureWriter(Arc::clone(&events)))
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut logger = PageLogger::create(1, 4).unwrap();
            let mut w = logger.page_writer(0).unwrap();
            write!(w, "abcdef").unwrap();
        });
        let text = String::from_utf8(events.lock().unwrap().clone()).unwrap();
        assert!(text.contains("page write truncated"), "{text}");
        assert!(text.contains("requested=6"), "{text}");
        assert!(text.contains("written=4"), "{text}");
    }

    #[test]
    fn print_flush_clears_page() {
        let mut logger = PageLogger::create(2, 16).unwrap();
        logger.write_str(1, "flushed").unwrap();
        let mut out = Vec::new();
        logger.print_page(1, PrintCommand::Flush, &mut out).unwrap();
        assert_eq!(out, b"Page 1: flushed\n");
        assert!(logger.page(1).unwrap().contents().is_empty());
    }

    #[test]
    fn print_unknown_page_is_invalid_input() {
        let mut logger = PageLogger::create(1, 16).unwrap();
        let mut out = Vec::new();
        let err = logger
            .print_page(5, PrintCommand::Default, &mut out)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(out.is_empty());
    }

    #[test]
    fn debug_output_lists_dimensions() {
        let logger = PageLogger::create(3, 16).unwrap();
        let text = format!("{logger:?}");
        assert!(text.contains("page_amount: 3"));
        assert!(text.contains("page_size: 16"));
    }
}
