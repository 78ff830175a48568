//! # Layout Constants
//!
//! Every value that shapes the on-disk format lives here. The file is a raw
//! sequence of 4096-byte pages with no file header; page 0 is always the
//! tree root. Rows are fixed-width, so the whole format collapses into the
//! handful of derived constants below.
//!
//! ## Dependency Graph
//!
//! ```text
//! PAGE_SIZE (4096)
//!       │
//!       ├─> LEAF_NODE_SPACE_FOR_CELLS (PAGE_SIZE - LEAF_NODE_HEADER_SIZE)
//!       │         │
//!       │         └─> LEAF_NODE_MAX_CELLS (/ LEAF_NODE_CELL_SIZE)
//!       │                   │
//!       │                   └─> LEAF_NODE_RIGHT_SPLIT_COUNT / LEFT_SPLIT_COUNT
//!       │
//!       └─> LEAF_NODE_NEXT_LEAF_OFFSET (last 4 bytes of the page)
//!
//! ROW_SIZE (293 = id 4 + username slot 33 + email slot 256)
//!       │
//!       └─> LEAF_NODE_CELL_SIZE (key 4 + ROW_SIZE = 297)
//! ```
//!
//! ## Critical Invariants
//!
//! Enforced by compile-time assertions at the bottom of this file:
//!
//! 1. `ROW_SIZE == 293`: the serialized row image matches the file format
//! 2. `LEAF_NODE_MAX_CELLS == 13`: leaf capacity matches the file format
//! 3. The packed cell body never overlaps the sibling pointer in the page
//!    tail
//! 4. A leaf split distributes all `MAX + 1` cells across the two halves
//!
//! ## Modifying Constants
//!
//! Any change here changes the file format. Databases written with a
//! different set of constants are unreadable; there is no version field to
//! detect the mismatch.

// ============================================================================
// PAGE AND CACHE CONFIGURATION
// ============================================================================

/// Size of each database page in bytes. This is the unit of I/O and caching.
pub const PAGE_SIZE: usize = 4096;

/// Hard ceiling on cached pages. The pager never evicts, so this is also the
/// maximum number of pages a database file may grow to within one process.
pub const MAX_CACHED_PAGES: usize = 100;

/// The tree root is always page 0. Root splits preserve this identity by
/// relocating the old root's bytes and rewriting page 0 in place.
pub const ROOT_PAGE_NUM: u32 = 0;

// ============================================================================
// ROW LAYOUT
// A row is (id, username, email) serialized into fixed-width slots. Text
// slots reserve one byte beyond the maximum content length so a full-length
// string still carries a NUL terminator.
// ============================================================================

/// Serialized size of the row id.
pub const ID_SIZE: usize = size_of::<u32>();

/// Maximum username length in bytes.
pub const USERNAME_MAX_LENGTH: usize = 32;

/// Maximum email length in bytes.
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Width of the username slot (content + NUL terminator).
pub const USERNAME_SLOT_SIZE: usize = USERNAME_MAX_LENGTH + 1;

/// Width of the email slot (content + NUL terminator).
pub const EMAIL_SLOT_SIZE: usize = EMAIL_MAX_LENGTH + 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SLOT_SIZE;

/// Serialized size of a full row.
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SLOT_SIZE + EMAIL_SLOT_SIZE;

// ============================================================================
// COMMON NODE HEADER
// Shared by leaf and internal nodes: node type, root flag, parent pointer.
// ============================================================================

pub const NODE_TYPE_OFFSET: usize = 0;
pub const IS_ROOT_OFFSET: usize = 1;
pub const PARENT_POINTER_OFFSET: usize = 2;
pub const PARENT_POINTER_SIZE: usize = size_of::<u32>();

/// Size of the header fields shared by both node types.
pub const COMMON_NODE_HEADER_SIZE: usize =
    PARENT_POINTER_OFFSET + PARENT_POINTER_SIZE;

// ============================================================================
// LEAF NODE LAYOUT
// Header, then tightly packed cells of key + row. The sibling pointer lives
// in the last four bytes of the page, which the cell body can never reach.
// ============================================================================

pub const LEAF_NODE_NUM_CELLS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;
pub const LEAF_NODE_NUM_CELLS_SIZE: usize = size_of::<u32>();

/// Size of the leaf header; cells are packed immediately after it.
pub const LEAF_NODE_HEADER_SIZE: usize =
    LEAF_NODE_NUM_CELLS_OFFSET + LEAF_NODE_NUM_CELLS_SIZE;

pub const LEAF_NODE_KEY_SIZE: usize = size_of::<u32>();
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + ROW_SIZE;

/// Bytes available for cells after the leaf header.
pub const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;

/// Maximum cells a leaf can hold before it must split.
pub const LEAF_NODE_MAX_CELLS: usize =
    LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

/// Offset of the next-leaf sibling pointer (0 = rightmost leaf).
pub const LEAF_NODE_NEXT_LEAF_OFFSET: usize = PAGE_SIZE - size_of::<u32>();

/// Cells moved to the new right sibling during a leaf split.
pub const LEAF_NODE_RIGHT_SPLIT_COUNT: usize = (LEAF_NODE_MAX_CELLS + 1) / 2;

/// Cells kept in the original page during a leaf split.
pub const LEAF_NODE_LEFT_SPLIT_COUNT: usize =
    LEAF_NODE_MAX_CELLS + 1 - LEAF_NODE_RIGHT_SPLIT_COUNT;

// ============================================================================
// INTERNAL NODE LAYOUT
// Header, then packed cells of {child, key}; the child holding keys greater
// than every cell key is stored separately as the right child.
// ============================================================================

pub const INTERNAL_NODE_NUM_KEYS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;
pub const INTERNAL_NODE_NUM_KEYS_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_RIGHT_CHILD_OFFSET: usize =
    INTERNAL_NODE_NUM_KEYS_OFFSET + INTERNAL_NODE_NUM_KEYS_SIZE;
pub const INTERNAL_NODE_RIGHT_CHILD_SIZE: usize = size_of::<u32>();

pub const INTERNAL_NODE_HEADER_SIZE: usize =
    INTERNAL_NODE_RIGHT_CHILD_OFFSET + INTERNAL_NODE_RIGHT_CHILD_SIZE;

pub const INTERNAL_NODE_CHILD_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_KEY_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_CELL_SIZE: usize =
    INTERNAL_NODE_CHILD_SIZE + INTERNAL_NODE_KEY_SIZE;

/// Maximum separator keys per internal node. A page could hold hundreds of
/// 8-byte cells; the fanout is kept tiny so multi-level trees and internal
/// splits appear after a handful of inserts.
pub const INTERNAL_NODE_MAX_KEYS: usize = 3;

// ============================================================================
// COMPILE-TIME INVARIANTS
// ============================================================================

const _: () = assert!(ROW_SIZE == 293, "row image size is part of the file format");

const _: () = assert!(
    LEAF_NODE_MAX_CELLS == 13,
    "leaf capacity is part of the file format"
);

const _: () = assert!(
    LEAF_NODE_HEADER_SIZE + LEAF_NODE_MAX_CELLS * LEAF_NODE_CELL_SIZE
        <= LEAF_NODE_NEXT_LEAF_OFFSET,
    "leaf cell body must not overlap the sibling pointer"
);

const _: () = assert!(
    LEAF_NODE_LEFT_SPLIT_COUNT + LEAF_NODE_RIGHT_SPLIT_COUNT
        == LEAF_NODE_MAX_CELLS + 1,
    "leaf split must distribute every cell"
);

const _: () = assert!(
    INTERNAL_NODE_HEADER_SIZE + (INTERNAL_NODE_MAX_KEYS + 1) * INTERNAL_NODE_CELL_SIZE
        <= PAGE_SIZE,
    "internal node body must fit in a page"
);

const _: () = assert!(
    INTERNAL_NODE_MAX_KEYS >= 3,
    "internal fanout below 3 cannot partition a split"
);
