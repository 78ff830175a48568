//! # Configuration Module
//!
//! Centralizes all layout and capacity constants for UnoDB. Constants are
//! grouped by functional area and their interdependencies are enforced
//! through compile-time assertions.
//!
//! ## Why Centralization?
//!
//! The on-disk format is a web of derived values: the row size determines
//! the leaf cell size, which together with the leaf header determines how
//! many cells fit in a page, which in turn fixes the split distribution.
//! Keeping every constant in one module (with `const` assertions tying them
//! together) prevents a change in one place from silently corrupting the
//! file format.
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric layout values with dependency documentation

pub mod constants;
pub use constants::*;
