//! # Cursor
//!
//! A cursor names a position in the tree: a leaf page, a cell index within
//! it, and whether the position is past the last row. Cursors come from
//! [`BTree::start`] and [`BTree::find`] and move with [`BTree::advance`];
//! they are plain data and hold no borrow of the tree, so a structural
//! modification on their path invalidates them silently.
//!
//! [`BTree::start`]: super::BTree::start
//! [`BTree::find`]: super::BTree::find
//! [`BTree::advance`]: super::BTree::advance

/// Position handle into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page_num: u32,
    pub cell_num: u32,
    pub end_of_table: bool,
}

impl Cursor {
    pub fn new(page_num: u32, cell_num: u32, end_of_table: bool) -> Self {
        Self {
            page_num,
            cell_num,
            end_of_table,
        }
    }
}
