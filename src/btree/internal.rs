//! # Internal Node Page Views
//!
//! An internal node routes descent. It stores `{child, key}` cells where
//! the child holds keys less than or equal to the cell key, plus a
//! dedicated right child for everything greater than the last cell key.
//!
//! ## Page Layout
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  --------------------------------------------
//! 0       1     node type (0x01 = internal)
//! 1       1     root flag
//! 2       4     parent page number
//! 6       4     key count
//! 10      4     right child page number
//! 14      8*N   cells: {child: u32, key: u32}
//! ```
//!
//! Each cell key is the maximum key of the subtree under its child, so a
//! leaf split refreshes the stale cell key of the half that shrank.

use eyre::{ensure, Result};

use crate::config::{
    INTERNAL_NODE_CELL_SIZE, INTERNAL_NODE_CHILD_SIZE, INTERNAL_NODE_HEADER_SIZE,
    INTERNAL_NODE_MAX_KEYS, INTERNAL_NODE_NUM_KEYS_OFFSET, INTERNAL_NODE_RIGHT_CHILD_OFFSET,
    PAGE_SIZE,
};

use super::{common_header, common_header_mut, read_u32, write_u32, NodeType};

fn cell_offset(index: usize) -> usize {
    INTERNAL_NODE_HEADER_SIZE + index * INTERNAL_NODE_CELL_SIZE
}

fn key_offset(index: usize) -> usize {
    cell_offset(index) + INTERNAL_NODE_CHILD_SIZE
}

#[derive(Debug)]
pub struct InternalNode<'a> {
    data: &'a [u8],
}

pub struct InternalNodeMut<'a> {
    data: &'a mut [u8],
}

impl<'a> InternalNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let node_type = common_header(data).node_type()?;
        ensure!(
            node_type == NodeType::Internal,
            "expected internal page, got {:?}",
            node_type
        );
        Ok(Self { data })
    }

    pub fn num_keys(&self) -> u32 {
        read_u32(self.data, INTERNAL_NODE_NUM_KEYS_OFFSET)
    }

    pub fn right_child(&self) -> u32 {
        read_u32(self.data, INTERNAL_NODE_RIGHT_CHILD_OFFSET)
    }

    pub fn is_root(&self) -> bool {
        common_header(self.data).is_root()
    }

    pub fn parent(&self) -> u32 {
        common_header(self.data).parent()
    }

    pub fn key_at(&self, index: usize) -> Result<u32> {
        ensure!(
            index < self.num_keys() as usize,
            "key index {} out of bounds (num_keys={})",
            index,
            self.num_keys()
        );
        Ok(read_u32(self.data, key_offset(index)))
    }

    /// Child pointer `index`, where `index == num_keys` names the right
    /// child.
    pub fn child_at(&self, index: usize) -> Result<u32> {
        let num_keys = self.num_keys() as usize;
        ensure!(
            index <= num_keys,
            "child index {} out of bounds (num_keys={})",
            index,
            num_keys
        );
        if index == num_keys {
            Ok(self.right_child())
        } else {
            Ok(read_u32(self.data, cell_offset(index)))
        }
    }

    /// Index of the child pointer to follow for `key`: the smallest cell
    /// whose key is `>= key`, or `num_keys` for the right child.
    pub fn find_child_index(&self, key: u32) -> usize {
        let count = self.num_keys() as usize;
        let mut low = 0;
        let mut high = count;

        while low < high {
            let mid = low + (high - low) / 2;
            if read_u32(self.data, key_offset(mid)) < key {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        low
    }
}

impl<'a> InternalNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let node_type = common_header(data).node_type()?;
        ensure!(
            node_type == NodeType::Internal,
            "expected internal page, got {:?}",
            node_type
        );
        Ok(Self { data })
    }

    /// Formats a page as an empty non-root internal node.
    pub fn init(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        {
            let header = common_header_mut(data);
            header.set_node_type(NodeType::Internal);
            header.set_is_root(false);
            header.set_parent(0);
        }
        write_u32(data, INTERNAL_NODE_NUM_KEYS_OFFSET, 0);
        write_u32(data, INTERNAL_NODE_RIGHT_CHILD_OFFSET, 0);
        Ok(Self { data })
    }

    pub fn as_ref(&self) -> InternalNode<'_> {
        InternalNode { data: self.data }
    }

    pub fn num_keys(&self) -> u32 {
        read_u32(self.data, INTERNAL_NODE_NUM_KEYS_OFFSET)
    }

    pub fn set_num_keys(&mut self, count: u32) {
        write_u32(self.data, INTERNAL_NODE_NUM_KEYS_OFFSET, count);
    }

    pub fn set_right_child(&mut self, page_num: u32) {
        write_u32(self.data, INTERNAL_NODE_RIGHT_CHILD_OFFSET, page_num);
    }

    pub fn set_is_root(&mut self, is_root: bool) {
        common_header_mut(self.data).set_is_root(is_root);
    }

    pub fn set_parent(&mut self, parent: u32) {
        common_header_mut(self.data).set_parent(parent);
    }

    pub fn set_key_at(&mut self, index: usize, key: u32) -> Result<()> {
        ensure!(
            index < self.num_keys() as usize,
            "key index {} out of bounds (num_keys={})",
            index,
            self.num_keys()
        );
        write_u32(self.data, key_offset(index), key);
        Ok(())
    }

    /// Writes cell `index` in place, without shifting neighbors.
    pub fn write_cell(&mut self, index: usize, child: u32, key: u32) -> Result<()> {
        ensure!(
            index < INTERNAL_NODE_MAX_KEYS,
            "cell index {} exceeds internal capacity {}",
            index,
            INTERNAL_NODE_MAX_KEYS
        );
        write_u32(self.data, cell_offset(index), child);
        write_u32(self.data, key_offset(index), key);
        Ok(())
    }

    /// Inserts a cell at `index`, shifting later cells one slot right.
    pub fn insert_cell(&mut self, index: usize, child: u32, key: u32) -> Result<()> {
        let count = self.num_keys() as usize;
        ensure!(
            count < INTERNAL_NODE_MAX_KEYS,
            "internal node is full ({} keys)",
            count
        );
        ensure!(
            index <= count,
            "insert index {} out of bounds (num_keys={})",
            index,
            count
        );

        if index < count {
            self.data
                .copy_within(cell_offset(index)..cell_offset(count), cell_offset(index + 1));
        }
        self.write_cell(index, child, key)?;
        self.set_num_keys(count as u32 + 1);
        Ok(())
    }
}
