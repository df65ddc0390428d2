//! Fill a few pages, print them, and dump the arena memory map.
//!
//! Run with `RUST_LOG=pagelog=debug,pagelog_arena=trace` to see lifecycle and truncation events.

use std::io;

use pagelog::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let page_amount = 6;
    let page_size = 1024;
    let mut logger = PageLogger::create(page_amount, page_size)?;
    println!("Logger created with {page_amount} pages of {page_size} bytes each.");

    logger.clear_all();
    logger.save_to_page(b"Hello, World!", 13, 0)?;
    logger.save_to_page(b"Hello, World!", 13, 1)?;
    logger.save_to_page_line(b"This is a test line.", 20, 1)?;
    logger.save_to_page_line(b"This is another test line.", 26, 1)?;
    logger.save_to_page(b"This is a test.", 15, 1)?;
    logger.set_page_type(1, PageType::Info)?;

    let mut out = io::stdout().lock();
    logger.print_page(0, PrintCommand::Default, &mut out)?;
    logger.print_all(&mut out)?;
    logger.debug_dump(&mut out)?;

    logger.destroy();
    Ok(())
}
