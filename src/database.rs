//! # Database Facade
//!
//! Ties the pager and the B+tree together behind the handful of operations
//! the REPL needs: open, insert, full select, structure dump, close. The
//! database owns exactly one table with a fixed schema; its rows are keyed
//! by their id.
//!
//! Opening an empty file materializes page 0 as an empty leaf root. Closing
//! is the single point where cached pages reach disk.

use std::path::Path;

use eyre::Result;

use crate::btree::{BTree, InsertOutcome};
use crate::record::Row;
use crate::storage::Pager;

pub struct Database {
    pager: Pager,
}

impl Database {
    /// Opens the database file, creating and formatting it if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut pager = Pager::open(path)?;
        if pager.num_pages() == 0 {
            BTree::new(&mut pager).init_root()?;
        }
        Ok(Self { pager })
    }

    /// Inserts a row keyed by its id. An existing id is reported, not
    /// overwritten.
    pub fn insert(&mut self, row: &Row) -> Result<InsertOutcome> {
        BTree::new(&mut self.pager).insert(row)
    }

    /// All rows in ascending id order.
    pub fn select(&mut self) -> Result<Vec<Row>> {
        let mut tree = BTree::new(&mut self.pager);
        let mut cursor = tree.start()?;
        let mut rows = Vec::new();
        while !cursor.end_of_table {
            rows.push(tree.row_at(&cursor)?);
            tree.advance(&mut cursor)?;
        }
        Ok(rows)
    }

    /// Pre-order dump of the tree structure.
    pub fn tree_display(&mut self) -> Result<String> {
        BTree::new(&mut self.pager).display()
    }

    /// Flushes every cached page to disk. The only flush point: rows
    /// inserted since open are lost if the process dies before this runs.
    pub fn close(mut self) -> Result<()> {
        self.pager.flush()
    }
}
