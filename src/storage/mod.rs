//! # Storage Module
//!
//! The storage layer owns the database file and the in-memory page buffers.
//! Everything above it (the B+tree, the cursor, the REPL) addresses storage
//! exclusively through page numbers.
//!
//! ## Architecture
//!
//! The database file is a raw sequence of [`PAGE_SIZE`] pages with no file
//! header and no magic number. Page `n` lives at byte offset
//! `n * PAGE_SIZE`; the file length is always a whole number of pages.
//!
//! The [`Pager`] loads pages on demand into a fixed set of
//! [`MAX_CACHED_PAGES`] buffers and never evicts. Every cached page is
//! treated as dirty: the single flush point (process shutdown) writes all
//! of them back. A crash before that loses unwritten pages by design.
//!
//! [`PAGE_SIZE`]: crate::config::PAGE_SIZE
//! [`MAX_CACHED_PAGES`]: crate::config::MAX_CACHED_PAGES

mod pager;

pub use pager::Pager;
