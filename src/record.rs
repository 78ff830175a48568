//! # Row Codec
//!
//! Fixed-width serialization for the single table's rows. A row is the
//! tuple `(id, username, email)` and always occupies [`ROW_SIZE`] bytes:
//!
//! ```text
//! Offset  Size  Field     Encoding
//! ------  ----  --------  ------------------------------------------
//! 0       4     id        u32, little-endian
//! 4       33    username  raw bytes, NUL-padded to the slot boundary
//! 37      256   email     raw bytes, NUL-padded to the slot boundary
//! ```
//!
//! Text slots reserve one byte beyond the maximum content length, so even a
//! full-length string is NUL-terminated. Reads stop at the first NUL or the
//! slot boundary, whichever comes first.
//!
//! The codec enforces slot capacity with hard errors; the user-facing
//! length validation (with its fixed error messages) happens in the
//! statement preparer before a row is ever constructed.

use eyre::{ensure, eyre, Result};
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{
    EMAIL_MAX_LENGTH, EMAIL_SLOT_SIZE, ROW_SIZE, USERNAME_MAX_LENGTH, USERNAME_SLOT_SIZE,
};
use crate::zerocopy_accessors;

/// On-disk image of a row. Field order matches the serialized layout.
#[repr(C)]
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RowImage {
    id: U32<LittleEndian>,
    username: [u8; USERNAME_SLOT_SIZE],
    email: [u8; EMAIL_SLOT_SIZE],
}

impl RowImage {
    zerocopy_accessors! {
        id: u32,
    }
}

const _: () = assert!(size_of::<RowImage>() == ROW_SIZE);

/// A single table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    /// Serializes the row into exactly [`ROW_SIZE`] bytes. Unused slot
    /// bytes are zeroed so a reread terminates at the content boundary.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<()> {
        ensure!(
            dst.len() == ROW_SIZE,
            "row destination must be {} bytes, got {}",
            ROW_SIZE,
            dst.len()
        );
        ensure!(
            self.username.len() <= USERNAME_MAX_LENGTH,
            "username exceeds slot capacity: {} > {}",
            self.username.len(),
            USERNAME_MAX_LENGTH
        );
        ensure!(
            self.email.len() <= EMAIL_MAX_LENGTH,
            "email exceeds slot capacity: {} > {}",
            self.email.len(),
            EMAIL_MAX_LENGTH
        );

        let image = RowImage::mut_from_bytes(dst)
            .map_err(|e| eyre!("failed to map row image: {:?}", e))?;
        image.set_id(self.id);
        image.username = [0u8; USERNAME_SLOT_SIZE];
        image.username[..self.username.len()].copy_from_slice(self.username.as_bytes());
        image.email = [0u8; EMAIL_SLOT_SIZE];
        image.email[..self.email.len()].copy_from_slice(self.email.as_bytes());
        Ok(())
    }

    /// Deserializes a row from exactly [`ROW_SIZE`] bytes.
    pub fn read_from(src: &[u8]) -> Result<Row> {
        ensure!(
            src.len() == ROW_SIZE,
            "row source must be {} bytes, got {}",
            ROW_SIZE,
            src.len()
        );

        let image = RowImage::ref_from_bytes(src)
            .map_err(|e| eyre!("failed to map row image: {:?}", e))?;
        Ok(Row {
            id: image.id(),
            username: slot_to_string(&image.username)?,
            email: slot_to_string(&image.email)?,
        })
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn slot_to_string(slot: &[u8]) -> Result<String> {
    let len = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    let text = std::str::from_utf8(&slot[..len])
        .map_err(|e| eyre!("row text is not valid UTF-8: {}", e))?;
    Ok(text.to_string())
}
