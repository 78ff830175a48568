//! # B+Tree Index Implementation
//!
//! Disk-backed B+tree over fixed 4096-byte pages, keyed by the row id.
//! All rows live in leaf nodes; internal nodes route descent with
//! separator keys. Leaves are linked left-to-right for ordered scans.
//!
//! ## Node Types
//!
//! - **Leaf nodes**: packed `{key, row}` cells in ascending key order,
//!   plus a sibling pointer to the next leaf.
//! - **Internal nodes**: packed `{child, key}` cells (child to the left of
//!   the key) plus a dedicated right child for keys greater than every
//!   cell key.
//!
//! Both start with a 6-byte common header: node type, root flag, and the
//! parent page number. Splits use the parent pointer to walk back up.
//!
//! ## Page-Based Storage
//!
//! Nodes reference each other by page number, never by memory address, so
//! the tree persists without translation. Page 0 is always the root: a
//! root split copies the old root's bytes to a fresh page and rewrites
//! page 0 in place.
//!
//! ## Module Structure
//!
//! - `leaf`: leaf node page views
//! - `internal`: internal node page views
//! - `cursor`: position handle used by scans and inserts
//! - `tree`: insert, lookup, splits, ordered scan, structure dump

mod cursor;
mod internal;
mod leaf;
mod tree;

pub use cursor::Cursor;
pub use internal::{InternalNode, InternalNodeMut};
pub use leaf::{LeafNode, LeafNodeMut};
pub use tree::{BTree, InsertOutcome};

use eyre::{bail, Result};
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::COMMON_NODE_HEADER_SIZE;
use crate::zerocopy_accessors;

/// Discriminant stored in the first byte of every node page.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Leaf = 0x00,
    Internal = 0x01,
}

impl NodeType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x00 => Ok(NodeType::Leaf),
            0x01 => Ok(NodeType::Internal),
            other => bail!("invalid node type byte: {:#04x}", other),
        }
    }
}

/// Outcome of a key search within one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found(usize),
    NotFound(usize),
}

/// Header fields shared by leaf and internal nodes.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct CommonHeader {
    node_type: u8,
    is_root: u8,
    parent: U32<LittleEndian>,
}

impl CommonHeader {
    zerocopy_accessors! {
        parent: u32,
    }

    pub fn node_type(&self) -> Result<NodeType> {
        NodeType::from_byte(self.node_type)
    }

    pub fn set_node_type(&mut self, node_type: NodeType) {
        self.node_type = node_type as u8;
    }

    pub fn is_root(&self) -> bool {
        self.is_root != 0
    }

    pub fn set_is_root(&mut self, is_root: bool) {
        self.is_root = is_root as u8;
    }
}

const _: () = assert!(size_of::<CommonHeader>() == COMMON_NODE_HEADER_SIZE);

/// Reads the common header of a node page.
pub(crate) fn common_header(page: &[u8]) -> &CommonHeader {
    // INVARIANT: every node view validates the page length up front
    CommonHeader::ref_from_bytes(&page[..COMMON_NODE_HEADER_SIZE]).unwrap()
}

/// Reads the common header of a node page for mutation.
pub(crate) fn common_header_mut(page: &mut [u8]) -> &mut CommonHeader {
    // INVARIANT: every node view validates the page length up front
    CommonHeader::mut_from_bytes(&mut page[..COMMON_NODE_HEADER_SIZE]).unwrap()
}

/// Node type of a raw page buffer.
pub fn node_type(page: &[u8]) -> Result<NodeType> {
    common_header(page).node_type()
}

pub(crate) fn read_u32(page: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&page[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

pub(crate) fn write_u32(page: &mut [u8], offset: usize, value: u32) {
    page[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PAGE_SIZE;

    #[test]
    fn node_type_from_byte_rejects_garbage() {
        assert_eq!(NodeType::from_byte(0x00).unwrap(), NodeType::Leaf);
        assert_eq!(NodeType::from_byte(0x01).unwrap(), NodeType::Internal);
        assert!(NodeType::from_byte(0x02).is_err());
    }

    #[test]
    fn common_header_is_six_bytes() {
        assert_eq!(size_of::<CommonHeader>(), 6);
    }

    #[test]
    fn common_header_round_trips_through_page_bytes() {
        let mut page = [0u8; PAGE_SIZE];

        {
            let header = common_header_mut(&mut page);
            header.set_node_type(NodeType::Internal);
            header.set_is_root(true);
            header.set_parent(42);
        }

        let header = common_header(&page);
        assert_eq!(header.node_type().unwrap(), NodeType::Internal);
        assert!(header.is_root());
        assert_eq!(header.parent(), 42);
        assert_eq!(page[0], 0x01);
        assert_eq!(page[1], 0x01);
        assert_eq!(&page[2..6], &[42, 0, 0, 0]);
    }

    #[test]
    fn u32_helpers_are_little_endian() {
        let mut page = [0u8; 8];
        write_u32(&mut page, 2, 0x0A0B0C0D);

        assert_eq!(&page[2..6], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(read_u32(&page, 2), 0x0A0B0C0D);
    }
}
