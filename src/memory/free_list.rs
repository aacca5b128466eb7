//! Free list
//!
//! Offset-ordered list of unused byte ranges with first-fit allocation and
//! coalescing on release.
//!
//! Invariant: blocks are sorted by position and no two blocks overlap or
//! touch. A pair of touching blocks means a merge was missed.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// An unused byte range in the memory file
///
/// Unlike a `Handle`, `len` is measured in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBlock {
    /// Offset of the first free byte
    pub position: u64,

    /// Size in bytes
    pub len: u64,
}

impl FreeBlock {
    pub fn new(position: u64, len: u64) -> Self {
        Self { position, len }
    }

    /// Offset one past the last free byte
    pub fn end(&self) -> u64 {
        self.position + self.len
    }
}

/// Free blocks sorted ascending by position
///
/// Linear first-fit scan and linear insert; fine for the small lists a
/// single memory file produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeList {
    blocks: Vec<FreeBlock>,
}

impl FreeList {
    /// Create an empty free list
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a free list from blocks (e.g. a snapshot)
    ///
    /// Blocks are re-released one by one, so ordering and coalescing hold
    /// no matter what order they come in.
    pub fn from_blocks(blocks: impl IntoIterator<Item = FreeBlock>) -> Self {
        let mut list = Self::new();
        for block in blocks {
            list.release(block);
        }
        list
    }

    /// Number of free blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Free blocks in position order
    pub fn blocks(&self) -> &[FreeBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreeBlock> {
        self.blocks.iter()
    }

    /// Total free bytes
    pub fn total_free(&self) -> u64 {
        self.blocks.iter().map(|b| b.len).sum()
    }

    /// First-fit allocation of `size` bytes
    ///
    /// Takes the first block (in position order) with at least `size`
    /// bytes. An exact fit removes the block; a larger block keeps its
    /// leftover tail. Returns the offset to write at, or `None` when no
    /// block is large enough.
    pub fn allocate(&mut self, size: u64) -> Option<u64> {
        let index = self.first_fit(size)?;
        Some(self.consume(index, size))
    }

    /// Index of the first block with room for `size` bytes, without
    /// taking it
    pub fn first_fit(&self, size: u64) -> Option<usize> {
        if size == 0 {
            return None;
        }
        self.blocks.iter().position(|b| b.len >= size)
    }

    /// Take `size` bytes from the front of the block at `index`
    ///
    /// `index` must come from `first_fit` with the same `size`, with no
    /// mutation in between. Returns the offset of the taken bytes.
    pub fn consume(&mut self, index: usize, size: u64) -> u64 {
        let block = &mut self.blocks[index];
        let position = block.position;
        debug_assert!(block.len >= size, "free block {:?} too small for {}", block, size);

        if block.len == size {
            self.blocks.remove(index);
        } else {
            block.position += size;
            block.len -= size;
        }

        position
    }

    /// Return a byte range to the free list, merging with its neighbours
    ///
    /// Zero-length blocks are ignored.
    pub fn release(&mut self, block: FreeBlock) {
        if block.len == 0 {
            return;
        }

        let index = self.blocks.partition_point(|b| b.position < block.position);
        self.blocks.insert(index, block);

        debug_assert!(
            index == 0 || self.blocks[index - 1].end() <= block.position,
            "free block {:?} overlaps its left neighbour",
            block
        );
        debug_assert!(
            index + 1 >= self.blocks.len() || block.end() <= self.blocks[index + 1].position,
            "free block {:?} overlaps its right neighbour",
            block
        );

        // Right neighbour first so `index` stays valid for the left merge
        if index + 1 < self.blocks.len() && self.blocks[index].end() == self.blocks[index + 1].position {
            let right = self.blocks.remove(index + 1);
            self.blocks[index].len += right.len;
            debug!(position = block.position, "coalesced free block with right neighbour");
        }

        if index > 0 && self.blocks[index - 1].end() == self.blocks[index].position {
            let merged = self.blocks.remove(index);
            self.blocks[index - 1].len += merged.len;
            debug!(position = block.position, "coalesced free block with left neighbour");
        }
    }

    /// Remove the last block if it ends exactly at `eof`
    ///
    /// Used by cascading tail release after the file shrinks.
    pub fn pop_tail(&mut self, eof: u64) -> Option<FreeBlock> {
        match self.blocks.last() {
            Some(last) if last.end() == eof => self.blocks.pop(),
            _ => None,
        }
    }

    /// Check the ordering/coalescing invariant
    pub fn is_coalesced(&self) -> bool {
        self.blocks.windows(2).all(|pair| pair[0].end() < pair[1].position)
    }
}
