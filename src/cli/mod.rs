//! # CLI Module
//!
//! The line-oriented front end: a statement preparer for the two-statement
//! grammar (`insert`, `select`), a handler for dot commands (`.exit`,
//! `.btree`, `.constants`), and the REPL loop tying them to a database.
//!
//! Output is a strict contract: every accepted line is preceded by the
//! `db > ` prompt on stdout, recoverable errors print fixed messages and
//! the loop continues, and the pager flushes only on exit.

mod commands;
mod repl;
mod statement;

pub use commands::{CommandHandler, CommandResult};
pub use repl::Repl;
pub use statement::{prepare, PrepareError, Statement};
