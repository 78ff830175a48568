//! # B+Tree Operations
//!
//! This module implements the tree algorithms over the pager: point
//! lookup, ordered insertion with splits, cursor traversal, and the
//! structure dump.
//!
//! ## Insert Algorithm
//!
//! ```text
//! 1. Descend from page 0 comparing separator keys
//! 2. At the leaf, binary-search the insertion point
//! 3. Equal key present: report a duplicate, change nothing
//! 4. Room in the leaf: shift cells right and write the new cell
//! 5. Leaf full: split
//! ```
//!
//! ## Splits
//!
//! A split snapshots all cells plus the incoming one, then redistributes
//! them across the original page (left half) and a freshly allocated right
//! sibling. The sibling chain is relinked through the new page. The parent
//! then needs two fixes: the cell key that tracked the left half's maximum
//! went stale when the upper half moved out, so it is refreshed, and the
//! new sibling is inserted keyed by its own maximum. A full parent splits
//! the same way, promoting its median toward the root.
//!
//! ## Root Splits
//!
//! Page 0 is the root forever. When the root splits, its bytes move to a
//! freshly allocated page (children re-parented to the copy) and page 0 is
//! rewritten in place as a new internal root with exactly one key and two
//! children.

use eyre::{ensure, Result};

use crate::config::{
    INTERNAL_NODE_MAX_KEYS, LEAF_NODE_LEFT_SPLIT_COUNT, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_RIGHT_SPLIT_COUNT, ROOT_PAGE_NUM, ROW_SIZE,
};
use crate::record::Row;
use crate::storage::Pager;

use super::{
    common_header_mut, node_type, Cursor, InternalNode, InternalNodeMut, LeafNode, LeafNodeMut,
    NodeType, SearchResult,
};

/// Result of an insert attempt. Duplicates are an expected outcome, not a
/// failure: the caller reports them and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateKey,
}

pub struct BTree<'a> {
    pager: &'a mut Pager,
}

impl<'a> BTree<'a> {
    pub fn new(pager: &'a mut Pager) -> Self {
        Self { pager }
    }

    /// Formats page 0 as an empty leaf root. Called once, on a database
    /// file with no pages.
    pub fn init_root(&mut self) -> Result<()> {
        ensure!(
            self.pager.num_pages() == 0,
            "root initialization on a non-empty database ({} pages)",
            self.pager.num_pages()
        );
        let page = self.pager.get_page(ROOT_PAGE_NUM)?;
        let mut root = LeafNodeMut::init(&mut page[..])?;
        root.set_is_root(true);
        Ok(())
    }

    /// Descends to the leaf position for `key`. The cursor may point one
    /// past the last cell when `key` is greater than everything stored.
    pub fn find(&mut self, key: u32) -> Result<Cursor> {
        let mut page_num = ROOT_PAGE_NUM;
        loop {
            let page = self.pager.get_page(page_num)?;
            match node_type(&page[..])? {
                NodeType::Leaf => {
                    let leaf = LeafNode::from_page(&page[..])?;
                    let cell = match leaf.find_key(key) {
                        SearchResult::Found(i) | SearchResult::NotFound(i) => i,
                    };
                    return Ok(Cursor::new(page_num, cell as u32, false));
                }
                NodeType::Internal => {
                    let node = InternalNode::from_page(&page[..])?;
                    let child_index = node.find_child_index(key);
                    page_num = node.child_at(child_index)?;
                }
            }
        }
    }

    /// Cursor at the first row in key order.
    pub fn start(&mut self) -> Result<Cursor> {
        let mut page_num = ROOT_PAGE_NUM;
        loop {
            let page = self.pager.get_page(page_num)?;
            match node_type(&page[..])? {
                NodeType::Leaf => {
                    let leaf = LeafNode::from_page(&page[..])?;
                    let end_of_table = leaf.num_cells() == 0;
                    return Ok(Cursor::new(page_num, 0, end_of_table));
                }
                NodeType::Internal => {
                    page_num = InternalNode::from_page(&page[..])?.child_at(0)?;
                }
            }
        }
    }

    /// Moves the cursor one row forward, following the sibling chain off
    /// the end of a leaf.
    pub fn advance(&mut self, cursor: &mut Cursor) -> Result<()> {
        ensure!(!cursor.end_of_table, "cursor advanced past end of table");

        cursor.cell_num += 1;
        let page = self.pager.get_page(cursor.page_num)?;
        let leaf = LeafNode::from_page(&page[..])?;
        if cursor.cell_num >= leaf.num_cells() {
            let next = leaf.next_leaf();
            if next == 0 {
                cursor.end_of_table = true;
            } else {
                cursor.page_num = next;
                cursor.cell_num = 0;
            }
        }
        Ok(())
    }

    /// Deserializes the row under the cursor.
    pub fn row_at(&mut self, cursor: &Cursor) -> Result<Row> {
        ensure!(!cursor.end_of_table, "cursor read past end of table");

        let page = self.pager.get_page(cursor.page_num)?;
        let leaf = LeafNode::from_page(&page[..])?;
        Row::read_from(leaf.value_at(cursor.cell_num as usize)?)
    }

    pub fn insert(&mut self, row: &Row) -> Result<InsertOutcome> {
        let key = row.id;
        let mut row_bytes = [0u8; ROW_SIZE];
        row.write_to(&mut row_bytes)?;

        let cursor = self.find(key)?;
        let num_cells = {
            let page = self.pager.get_page(cursor.page_num)?;
            let leaf = LeafNode::from_page(&page[..])?;
            let count = leaf.num_cells();
            if cursor.cell_num < count && leaf.key_at(cursor.cell_num as usize)? == key {
                return Ok(InsertOutcome::DuplicateKey);
            }
            count as usize
        };

        if num_cells < LEAF_NODE_MAX_CELLS {
            let page = self.pager.get_page(cursor.page_num)?;
            let mut leaf = LeafNodeMut::from_page(&mut page[..])?;
            leaf.insert_cell(cursor.cell_num as usize, key, &row_bytes)?;
        } else {
            self.leaf_split_insert(&cursor, key, &row_bytes)?;
        }
        Ok(InsertOutcome::Inserted)
    }

    /// Largest key in the subtree rooted at `page_num`.
    pub fn max_key(&mut self, page_num: u32) -> Result<u32> {
        let mut current = page_num;
        loop {
            let page = self.pager.get_page(current)?;
            match node_type(&page[..])? {
                NodeType::Leaf => return LeafNode::from_page(&page[..])?.max_key(),
                NodeType::Internal => {
                    current = InternalNode::from_page(&page[..])?.right_child();
                }
            }
        }
    }

    /// Splits the full leaf under `cursor` while inserting the new cell at
    /// its sorted position.
    fn leaf_split_insert(&mut self, cursor: &Cursor, key: u32, row: &[u8]) -> Result<()> {
        let (mut keys, mut values, old_max, old_next, parent) = {
            let page = self.pager.get_page(cursor.page_num)?;
            let leaf = LeafNode::from_page(&page[..])?;
            let count = leaf.num_cells() as usize;
            let mut keys = Vec::with_capacity(count + 1);
            let mut values: Vec<Vec<u8>> = Vec::with_capacity(count + 1);
            for i in 0..count {
                keys.push(leaf.key_at(i)?);
                values.push(leaf.value_at(i)?.to_vec());
            }
            (
                keys,
                values,
                leaf.max_key()?,
                leaf.next_leaf(),
                leaf.parent(),
            )
        };
        keys.insert(cursor.cell_num as usize, key);
        values.insert(cursor.cell_num as usize, row.to_vec());

        let right_page = self.pager.num_pages();
        {
            let page = self.pager.get_page(right_page)?;
            let mut right = LeafNodeMut::init(&mut page[..])?;
            for (slot, i) in (LEAF_NODE_LEFT_SPLIT_COUNT..keys.len()).enumerate() {
                right.write_cell(slot, keys[i], &values[i])?;
            }
            right.set_num_cells(LEAF_NODE_RIGHT_SPLIT_COUNT as u32);
            right.set_next_leaf(old_next);
            right.set_parent(parent);
        }
        {
            let page = self.pager.get_page(cursor.page_num)?;
            let mut left = LeafNodeMut::from_page(&mut page[..])?;
            for i in 0..LEAF_NODE_LEFT_SPLIT_COUNT {
                left.write_cell(i, keys[i], &values[i])?;
            }
            left.set_num_cells(LEAF_NODE_LEFT_SPLIT_COUNT as u32);
            left.set_next_leaf(right_page);
        }

        if cursor.page_num == ROOT_PAGE_NUM {
            self.create_new_root(right_page)
        } else {
            let left_max = keys[LEAF_NODE_LEFT_SPLIT_COUNT - 1];
            self.refresh_parent_key(parent, old_max, left_max)?;
            self.internal_insert(parent, right_page)
        }
    }

    /// Replaces page 0 with a fresh internal root over the relocated old
    /// root and the new right child.
    fn create_new_root(&mut self, right_child_page: u32) -> Result<()> {
        let left_page = self.pager.num_pages();
        let root_copy = {
            let page = self.pager.get_page(ROOT_PAGE_NUM)?;
            page.to_vec()
        };
        {
            let page = self.pager.get_page(left_page)?;
            page.copy_from_slice(&root_copy);
            let header = common_header_mut(&mut page[..]);
            header.set_is_root(false);
            header.set_parent(ROOT_PAGE_NUM);
        }

        // An internal old root keeps its subtrees; they must follow the copy.
        if node_type(&root_copy)? == NodeType::Internal {
            let node = InternalNode::from_page(&root_copy)?;
            let mut children = Vec::with_capacity(node.num_keys() as usize + 1);
            for i in 0..=node.num_keys() as usize {
                children.push(node.child_at(i)?);
            }
            for child in children {
                self.set_parent(child, left_page)?;
            }
        }
        self.set_parent(right_child_page, ROOT_PAGE_NUM)?;

        let left_max = self.max_key(left_page)?;
        {
            let page = self.pager.get_page(ROOT_PAGE_NUM)?;
            let mut root = InternalNodeMut::init(&mut page[..])?;
            root.set_is_root(true);
            root.write_cell(0, left_page, left_max)?;
            root.set_num_keys(1);
            root.set_right_child(right_child_page);
        }
        Ok(())
    }

    /// Inserts `child_page` into the internal node `parent_page`, keyed by
    /// the child's maximum. A child greater than the current right child
    /// takes over the right-child slot, demoting the old one to a cell.
    fn internal_insert(&mut self, parent_page: u32, child_page: u32) -> Result<()> {
        let child_max = self.max_key(child_page)?;
        let (num_keys, right_child_page) = {
            let page = self.pager.get_page(parent_page)?;
            let node = InternalNode::from_page(&page[..])?;
            (node.num_keys() as usize, node.right_child())
        };

        if num_keys >= INTERNAL_NODE_MAX_KEYS {
            return self.internal_split_insert(parent_page, child_page);
        }

        let right_max = self.max_key(right_child_page)?;
        {
            let page = self.pager.get_page(parent_page)?;
            let mut node = InternalNodeMut::from_page(&mut page[..])?;
            if child_max > right_max {
                node.write_cell(num_keys, right_child_page, right_max)?;
                node.set_num_keys(num_keys as u32 + 1);
                node.set_right_child(child_page);
            } else {
                let index = node.as_ref().find_child_index(child_max);
                node.insert_cell(index, child_page, child_max)?;
            }
        }
        self.set_parent(child_page, parent_page)
    }

    /// Splits a full internal node while inserting `child_page`, promoting
    /// the median separator to the parent.
    fn internal_split_insert(&mut self, page_num: u32, child_page: u32) -> Result<()> {
        let child_max = self.max_key(child_page)?;

        // Snapshot (child, max-key) pairs in key order, right child last.
        let (mut pairs, right_child_page, parent) = {
            let page = self.pager.get_page(page_num)?;
            let node = InternalNode::from_page(&page[..])?;
            let num_keys = node.num_keys() as usize;
            let mut pairs = Vec::with_capacity(num_keys + 2);
            for i in 0..num_keys {
                pairs.push((node.child_at(i)?, node.key_at(i)?));
            }
            (pairs, node.right_child(), node.parent())
        };
        let old_max = self.max_key(right_child_page)?;
        pairs.push((right_child_page, old_max));

        let pos = pairs
            .iter()
            .position(|&(_, k)| k >= child_max)
            .unwrap_or(pairs.len());
        pairs.insert(pos, (child_page, child_max));

        let mid = pairs.len() / 2;
        let right_page = self.pager.num_pages();
        {
            let page = self.pager.get_page(right_page)?;
            let mut right = InternalNodeMut::init(&mut page[..])?;
            for (slot, &(child, key)) in pairs[mid..pairs.len() - 1].iter().enumerate() {
                right.write_cell(slot, child, key)?;
            }
            right.set_num_keys((pairs.len() - 1 - mid) as u32);
            right.set_right_child(pairs[pairs.len() - 1].0);
            right.set_parent(parent);
        }
        {
            let page = self.pager.get_page(page_num)?;
            let mut left = InternalNodeMut::from_page(&mut page[..])?;
            for (slot, &(child, key)) in pairs[..mid - 1].iter().enumerate() {
                left.write_cell(slot, child, key)?;
            }
            left.set_num_keys((mid - 1) as u32);
            left.set_right_child(pairs[mid - 1].0);
        }
        for &(child, _) in &pairs[..mid] {
            self.set_parent(child, page_num)?;
        }
        for &(child, _) in &pairs[mid..] {
            self.set_parent(child, right_page)?;
        }

        if page_num == ROOT_PAGE_NUM {
            self.create_new_root(right_page)
        } else {
            let left_max = pairs[mid - 1].1;
            self.refresh_parent_key(parent, old_max, left_max)?;
            self.internal_insert(parent, right_page)
        }
    }

    /// Refreshes the parent cell that tracked a child's old maximum after
    /// the child lost its upper half. No cell tracks the right child, so a
    /// right-child split needs no refresh here.
    fn refresh_parent_key(&mut self, parent_page: u32, old_key: u32, new_key: u32) -> Result<()> {
        let page = self.pager.get_page(parent_page)?;
        let mut node = InternalNodeMut::from_page(&mut page[..])?;
        let index = node.as_ref().find_child_index(old_key);
        if index < node.num_keys() as usize {
            node.set_key_at(index, new_key)?;
        }
        Ok(())
    }

    fn set_parent(&mut self, page_num: u32, parent: u32) -> Result<()> {
        let page = self.pager.get_page(page_num)?;
        common_header_mut(&mut page[..]).set_parent(parent);
        Ok(())
    }

    /// Pre-order dump of the tree structure, one node per line, indented
    /// by depth. Used by the `.btree` command.
    pub fn display(&mut self) -> Result<String> {
        let mut out = String::from("Tree:");
        self.dump_node(ROOT_PAGE_NUM, 0, &mut out)?;
        Ok(out)
    }

    fn dump_node(&mut self, page_num: u32, depth: usize, out: &mut String) -> Result<()> {
        enum Snapshot {
            Leaf(Vec<u32>),
            Internal { children: Vec<u32>, keys: Vec<u32> },
        }

        let snapshot = {
            let page = self.pager.get_page(page_num)?;
            match node_type(&page[..])? {
                NodeType::Leaf => {
                    let leaf = LeafNode::from_page(&page[..])?;
                    let mut keys = Vec::with_capacity(leaf.num_cells() as usize);
                    for i in 0..leaf.num_cells() as usize {
                        keys.push(leaf.key_at(i)?);
                    }
                    Snapshot::Leaf(keys)
                }
                NodeType::Internal => {
                    let node = InternalNode::from_page(&page[..])?;
                    let num_keys = node.num_keys() as usize;
                    let mut children = Vec::with_capacity(num_keys + 1);
                    let mut keys = Vec::with_capacity(num_keys);
                    for i in 0..num_keys {
                        children.push(node.child_at(i)?);
                        keys.push(node.key_at(i)?);
                    }
                    children.push(node.right_child());
                    Snapshot::Internal { children, keys }
                }
            }
        };

        let indent = "  ".repeat(depth);
        match snapshot {
            Snapshot::Leaf(keys) => {
                out.push_str(&format!("\n{}leaf (size {})", indent, keys.len()));
                for (i, key) in keys.iter().enumerate() {
                    out.push_str(&format!("\n{}  - {} : {}", indent, i, key));
                }
            }
            Snapshot::Internal { children, keys } => {
                out.push_str(&format!("\n{}internal (size {})", indent, keys.len()));
                for (i, key) in keys.iter().enumerate() {
                    self.dump_node(children[i], depth + 1, out)?;
                    out.push_str(&format!("\n{}  key {}", indent, key));
                }
                if let Some(&right) = children.last() {
                    self.dump_node(right, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }
}
