//! # Leaf Node Page Views
//!
//! A leaf node stores the table's rows as tightly packed `{key, row}`
//! cells in ascending key order.
//!
//! ## Page Layout
//!
//! ```text
//! Offset  Size   Field
//! ------  -----  --------------------------------------------
//! 0       1      node type (0x00 = leaf)
//! 1       1      root flag
//! 2       4      parent page number
//! 6       4      cell count
//! 10      3861   cells: 13 x {key: u32, row: 293 bytes}
//! ...            unused
//! 4092    4      next-leaf sibling pointer (0 = rightmost)
//! ```
//!
//! The sibling pointer sits in the page tail, past the furthest byte the
//! packed cell body can reach, so the cell area stays a single contiguous
//! run starting right after the 10-byte header.
//!
//! ## Views
//!
//! [`LeafNode`] borrows a page immutably for reads; [`LeafNodeMut`]
//! borrows it mutably for cell insertion and header updates. Both validate
//! the page length and node type up front, in the same way the storage
//! layer validates page buffers.

use eyre::{ensure, Result};

use crate::config::{
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_KEY_SIZE, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_NEXT_LEAF_OFFSET, LEAF_NODE_NUM_CELLS_OFFSET, PAGE_SIZE, ROW_SIZE,
};

use super::{
    common_header, common_header_mut, read_u32, write_u32, NodeType, SearchResult,
};

fn cell_offset(index: usize) -> usize {
    LEAF_NODE_HEADER_SIZE + index * LEAF_NODE_CELL_SIZE
}

fn value_offset(index: usize) -> usize {
    cell_offset(index) + LEAF_NODE_KEY_SIZE
}

#[derive(Debug)]
pub struct LeafNode<'a> {
    data: &'a [u8],
}

pub struct LeafNodeMut<'a> {
    data: &'a mut [u8],
}

impl<'a> LeafNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let node_type = common_header(data).node_type()?;
        ensure!(
            node_type == NodeType::Leaf,
            "expected leaf page, got {:?}",
            node_type
        );
        Ok(Self { data })
    }

    pub fn num_cells(&self) -> u32 {
        read_u32(self.data, LEAF_NODE_NUM_CELLS_OFFSET)
    }

    pub fn is_root(&self) -> bool {
        common_header(self.data).is_root()
    }

    pub fn parent(&self) -> u32 {
        common_header(self.data).parent()
    }

    pub fn next_leaf(&self) -> u32 {
        read_u32(self.data, LEAF_NODE_NEXT_LEAF_OFFSET)
    }

    pub fn key_at(&self, index: usize) -> Result<u32> {
        ensure!(
            index < self.num_cells() as usize,
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        Ok(read_u32(self.data, cell_offset(index)))
    }

    /// The serialized row stored in cell `index`.
    pub fn value_at(&self, index: usize) -> Result<&'a [u8]> {
        ensure!(
            index < self.num_cells() as usize,
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        let offset = value_offset(index);
        Ok(&self.data[offset..offset + ROW_SIZE])
    }

    /// Largest key in the leaf.
    pub fn max_key(&self) -> Result<u32> {
        let count = self.num_cells() as usize;
        ensure!(count > 0, "empty leaf has no max key");
        Ok(read_u32(self.data, cell_offset(count - 1)))
    }

    /// Binary search for `key`. `NotFound` carries the insertion point,
    /// which may be one past the last cell.
    pub fn find_key(&self, key: u32) -> SearchResult {
        let count = self.num_cells() as usize;
        let mut low = 0;
        let mut high = count;

        while low < high {
            let mid = low + (high - low) / 2;
            if read_u32(self.data, cell_offset(mid)) < key {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        if low < count && read_u32(self.data, cell_offset(low)) == key {
            SearchResult::Found(low)
        } else {
            SearchResult::NotFound(low)
        }
    }
}

impl<'a> LeafNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let node_type = common_header(data).node_type()?;
        ensure!(
            node_type == NodeType::Leaf,
            "expected leaf page, got {:?}",
            node_type
        );
        Ok(Self { data })
    }

    /// Formats a page as an empty non-root leaf.
    pub fn init(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        {
            let header = common_header_mut(data);
            header.set_node_type(NodeType::Leaf);
            header.set_is_root(false);
            header.set_parent(0);
        }
        write_u32(data, LEAF_NODE_NUM_CELLS_OFFSET, 0);
        write_u32(data, LEAF_NODE_NEXT_LEAF_OFFSET, 0);
        Ok(Self { data })
    }

    pub fn as_ref(&self) -> LeafNode<'_> {
        LeafNode { data: self.data }
    }

    pub fn num_cells(&self) -> u32 {
        read_u32(self.data, LEAF_NODE_NUM_CELLS_OFFSET)
    }

    pub fn set_num_cells(&mut self, count: u32) {
        write_u32(self.data, LEAF_NODE_NUM_CELLS_OFFSET, count);
    }

    pub fn set_is_root(&mut self, is_root: bool) {
        common_header_mut(self.data).set_is_root(is_root);
    }

    pub fn set_parent(&mut self, parent: u32) {
        common_header_mut(self.data).set_parent(parent);
    }

    pub fn set_next_leaf(&mut self, page_num: u32) {
        write_u32(self.data, LEAF_NODE_NEXT_LEAF_OFFSET, page_num);
    }

    /// Writes cell `index` in place, without shifting neighbors.
    pub fn write_cell(&mut self, index: usize, key: u32, row: &[u8]) -> Result<()> {
        ensure!(
            index < LEAF_NODE_MAX_CELLS,
            "cell index {} exceeds leaf capacity {}",
            index,
            LEAF_NODE_MAX_CELLS
        );
        ensure!(
            row.len() == ROW_SIZE,
            "leaf value must be {} bytes, got {}",
            ROW_SIZE,
            row.len()
        );
        write_u32(self.data, cell_offset(index), key);
        let offset = value_offset(index);
        self.data[offset..offset + ROW_SIZE].copy_from_slice(row);
        Ok(())
    }

    /// Inserts a cell at `index`, shifting later cells one slot right.
    pub fn insert_cell(&mut self, index: usize, key: u32, row: &[u8]) -> Result<()> {
        let count = self.num_cells() as usize;
        ensure!(
            count < LEAF_NODE_MAX_CELLS,
            "leaf is full ({} cells)",
            count
        );
        ensure!(
            index <= count,
            "insert index {} out of bounds (num_cells={})",
            index,
            count
        );

        if index < count {
            self.data
                .copy_within(cell_offset(index)..cell_offset(count), cell_offset(index + 1));
        }
        self.write_cell(index, key, row)?;
        self.set_num_cells(count as u32 + 1);
        Ok(())
    }
}
