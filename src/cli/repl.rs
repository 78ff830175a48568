//! # REPL - Read-Eval-Print Loop
//!
//! The interactive loop for the database CLI. Handles:
//!
//! - Printing the `db > ` prompt before every read
//! - Dispatching dot commands vs statements
//! - Executing statements and printing their fixed-format results
//! - Flushing the pager on the way out
//!
//! ## Execution Flow
//!
//! ```text
//! loop:
//!     print "db > ", flush
//!     read line (EOF ends the loop)
//!     starts with '.' ?
//!         yes -> CommandHandler (.exit ends the loop)
//!         no  -> prepare -> execute -> print result
//! flush pager
//! ```
//!
//! ## Output Contract
//!
//! The prompt carries no trailing newline, so a command's first output
//! line appears on the prompt's line. Recoverable errors (syntax, bad id,
//! long string, duplicate key) print their fixed message and the loop
//! continues; only I/O and pager failures abort.
//!
//! The loop is generic over its reader and writer so transcripts can be
//! driven in tests without a child process.

use std::io::{BufRead, Write};

use eyre::{Result, WrapErr};

use crate::btree::InsertOutcome;
use crate::cli::commands::{CommandHandler, CommandResult};
use crate::cli::statement::{prepare, Statement};
use crate::database::Database;

const PROMPT: &str = "db > ";

pub struct Repl<R, W> {
    db: Database,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(db: Database, input: R, output: W) -> Self {
        Self { db, input, output }
    }

    /// Runs until `.exit` or end of input, then flushes the database.
    pub fn run(mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", PROMPT).wrap_err("failed to write prompt")?;
            self.output.flush().wrap_err("failed to flush output")?;

            line.clear();
            let bytes_read = self
                .input
                .read_line(&mut line)
                .wrap_err("failed to read input")?;
            if bytes_read == 0 {
                break;
            }

            let input = line.trim();
            if CommandHandler::is_command(input) {
                match CommandHandler::execute(input, &mut self.db)? {
                    CommandResult::Exit => break,
                    CommandResult::Output(text) => {
                        writeln!(self.output, "{}", text).wrap_err("failed to write output")?;
                    }
                    CommandResult::Error(message) => {
                        writeln!(self.output, "{}", message)
                            .wrap_err("failed to write output")?;
                    }
                }
                continue;
            }

            match prepare(input) {
                Ok(Statement::Insert(row)) => match self.db.insert(&row)? {
                    InsertOutcome::Inserted => {
                        writeln!(self.output, "Executed.").wrap_err("failed to write output")?;
                    }
                    InsertOutcome::DuplicateKey => {
                        writeln!(self.output, "Error: Duplicate key.")
                            .wrap_err("failed to write output")?;
                    }
                },
                Ok(Statement::Select) => {
                    for row in self.db.select()? {
                        writeln!(self.output, "{}", row).wrap_err("failed to write output")?;
                    }
                    writeln!(self.output, "Executed.").wrap_err("failed to write output")?;
                }
                Err(error) => {
                    writeln!(self.output, "{}", error).wrap_err("failed to write output")?;
                }
            }
        }

        self.db.close()
    }
}
