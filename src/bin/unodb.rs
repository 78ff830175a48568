//! # UnoDB CLI Entry Point
//!
//! Binary entry point for the UnoDB command-line interface.
//!
//! ## Usage
//!
//! ```bash
//! # Open (or create) a database file and start the REPL
//! unodb ./my.db
//!
//! # Show version
//! unodb --version
//!
//! # Show help
//! unodb --help
//! ```

use std::io;
use std::path::PathBuf;

use eyre::{bail, Result, WrapErr};
use unodb::cli::Repl;
use unodb::Database;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("unodb {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            option if option.starts_with('-') => {
                bail!("unknown option: {}", option);
            }
            path => {
                if db_path.is_some() {
                    bail!("multiple database paths specified");
                }
                db_path = Some(PathBuf::from(path));
            }
        }
    }

    let Some(db_path) = db_path else {
        bail!("missing database file path (usage: unodb <dbfile>)");
    };

    let db = Database::open(&db_path)
        .wrap_err_with(|| format!("failed to open database at {:?}", db_path))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(db, stdin.lock(), stdout.lock()).run()
}

fn print_usage() {
    println!("UnoDB - single-file, single-table storage engine");
    println!();
    println!("USAGE:");
    println!("    unodb <DBFILE>");
    println!();
    println!("ARGS:");
    println!("    <DBFILE>    Path to the database file (created if missing)");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
}
