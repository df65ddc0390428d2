//! Console rendering of pages and of the arena memory map.
//!
//! Everything here is read-only over the ring and writes raw page bytes
//! to any [`io::Write`], so invalid UTF-8 in a page is passed through
//! untouched.

use std::io;
use std::ops::DerefMut;

use pagelog_arena::record::PageRecord;
use pagelog_arena::{Page, PageRing};

/// `Page {index}: {text}` followed by a newline.
pub fn write_page_line<W: io::Write>(out: &mut W, page: &Page<'_>) -> io::Result<()> {
    write!(out, "Page {}: ", page.index())?;
    out.write_all(page.contents())?;
    out.write_all(b"\n")
}

/// `remaining: {n}---[{text}]---` followed by a newline.
pub fn write_page_summary<W: io::Write>(out: &mut W, page: &Page<'_>) -> io::Result<()> {
    write!(out, "remaining: {}---[", page.remaining())?;
    out.write_all(page.contents())?;
    out.write_all(b"]---\n")
}

/// One summary line per page, in index order.
pub fn write_all_pages<W, B>(out: &mut W, ring: &PageRing<B>) -> io::Result<()>
where
    W: io::Write,
    B: DerefMut<Target = [u8]>,
{
    for page in ring.pages() {
        write_page_summary(out, &page)?;
    }
    Ok(())
}

/// Address and alignment facts about one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageAudit {
    /// Page index.
    pub index: usize,
    /// Address of the page record.
    pub record_addr: usize,
    /// Address of the first buffer byte.
    pub buffer_addr: usize,
    /// One past the last capacity byte.
    pub buffer_end: usize,
    /// Record satisfies its type's alignment.
    pub record_aligned: bool,
    /// Buffer satisfies the configured buffer alignment.
    pub buffer_aligned: bool,
    /// Record address of the next page, if this page's region runs into it.
    pub overlaps_next: Option<usize>,
}

/// Result of checking every page of a ring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutAudit {
    /// One entry per page, in index order.
    pub pages: Vec<PageAudit>,
}

impl LayoutAudit {
    /// No misalignment and no overlap anywhere.
    pub fn is_clean(&self) -> bool {
        self.pages
            .iter()
            .all(|p| p.record_aligned && p.buffer_aligned && p.overlaps_next.is_none())
    }
}

/// Check alignment and containment of every page.
pub fn audit<B: DerefMut<Target = [u8]>>(ring: &PageRing<B>) -> LayoutAudit {
    let buffer_align = ring.layout().buffer_align();
    let pages: Vec<Page<'_>> = ring.pages().collect();
    let audits = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            // The sentinel byte belongs to the page's region.
            let region_end = page.buffer_end() + 1;
            let overlaps_next = pages
                .get(i + 1)
                .map(|next| next.record_addr())
                .filter(|&next| region_end > next);
            PageAudit {
                index: page.index(),
                record_addr: page.record_addr(),
                buffer_addr: page.buffer_addr(),
                buffer_end: page.buffer_end(),
                record_aligned: page.record_addr() % PageRecord::ALIGN == 0,
                buffer_aligned: page.buffer_addr() % buffer_align == 0,
                overlaps_next,
            }
        })
        .collect();
    LayoutAudit { pages: audits }
}

/// Human-readable memory map with per-page alignment and overlap checks.
pub fn write_memory_map<W, B>(out: &mut W, ring: &PageRing<B>) -> io::Result<()>
where
    W: io::Write,
    B: DerefMut<Target = [u8]>,
{
    let report = audit(ring);
    writeln!(out, "Logger Memory Map Dump")?;
    writeln!(
        out,
        "  Arena         : {:#x} ({} bytes)",
        ring.base_addr(),
        ring.block_len()
    )?;
    for page in &report.pages {
        writeln!(out, "Page {}", page.index)?;
        writeln!(out, "  Entry address : {:#x}", page.record_addr)?;
        writeln!(out, "  Buffer address: {:#x}", page.buffer_addr)?;
        writeln!(out, "  Buffer end    : {:#x}", page.buffer_end)?;
        if !page.record_aligned {
            writeln!(out, "  Misaligned page record!")?;
        }
        if !page.buffer_aligned {
            writeln!(out, "  Misaligned buffer!")?;
        }
        if let Some(next) = page.overlaps_next {
            writeln!(
                out,
                "  Overlap detected with next page: buffer end {:#x} > next entry {:#x}",
                page.buffer_end, next
            )?;
        }
    }
    writeln!(out, "Dump complete: {} pages checked.", report.pages.len())
}
