//! Memory handles
//!
//! Position + logical length pair naming a record in the memory file.

use serde::{Deserialize, Serialize};

use crate::codec;

/// Handle to a stored record
///
/// `length` is the symbol count, not the byte count. The byte extent is
/// always `ceil(length / 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    /// Absolute byte offset into the memory file
    pub position: u64,

    /// Logical length in symbols
    pub length: u32,
}

impl Handle {
    pub fn new(position: u64, length: u32) -> Self {
        Self { position, length }
    }

    /// Number of packed bytes this record occupies
    pub fn byte_len(&self) -> u64 {
        codec::packed_len(self.length as usize) as u64
    }

    /// Offset one past the last byte of the record
    pub fn end(&self) -> u64 {
        self.position + self.byte_len()
    }
}
