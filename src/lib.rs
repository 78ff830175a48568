//! # UnoDB - Single-File, Single-Table Storage Engine
//!
//! UnoDB stores one fixed-schema table, `(id, username, email)` keyed by
//! the `u32` id, in a single file of 4096-byte pages, indexed by a
//! disk-backed B+tree. A line-oriented REPL fronts the engine with a
//! two-statement grammar (`insert`, `select`) and a few dot commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        CLI (REPL / preparer)         │
//! ├─────────────────────────────────────┤
//! │        Database facade               │
//! ├─────────────────────────────────────┤
//! │   B+Tree (nodes, cursor, splits)     │
//! ├─────────────────────────────────────┤
//! │        Row codec (293 bytes)         │
//! ├─────────────────────────────────────┤
//! │   Pager (100-slot page cache)        │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## File Layout
//!
//! The database file is a raw array of pages: no header, no magic, no
//! version. Page 0 is always the tree root; root splits relocate the old
//! root's bytes and rewrite page 0 in place so page numbers stay stable
//! identities. The file grows monotonically and pages are never reclaimed.
//!
//! ## Durability Model
//!
//! The process is single-threaded and the pager is the only component
//! touching the file. Cached pages reach disk at exactly one point: the
//! flush on clean shutdown (`.exit` or end of input). Anything else is
//! lost on a crash, by design.
//!
//! ## Module Overview
//!
//! - [`config`]: layout constants and their compile-time invariants
//! - [`record`]: fixed-width row codec
//! - [`storage`]: pager and page cache
//! - [`btree`]: node layouts, cursor, tree operations
//! - [`database`]: the facade the CLI talks to
//! - [`cli`]: statement preparer, dot commands, REPL

#[macro_use]
mod macros;

pub mod btree;
pub mod cli;
pub mod config;
pub mod database;
pub mod record;
pub mod storage;

pub use btree::InsertOutcome;
pub use database::Database;
pub use record::Row;
