//! Memory Manager
//!
//! Stores packed sequences in a single binary file.
//!
//! ## Responsibilities
//! - Encode and write records, first-fit over the free list, else append
//! - Release records: truncate a released tail, otherwise free + coalesce
//! - Read records back by handle
//! - Leave the file cursor where the caller had it

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec;
use crate::config::TailRelease;
use crate::error::{DnaDbError, Result};

use super::{FreeBlock, FreeList, Handle};

/// Owner of the memory file and its free list
///
/// Handles are only meaningful for the manager that produced them; no
/// validity checking is done on foreign or stale handles.
pub struct MemManager {
    /// Path of the memory file
    path: PathBuf,

    /// Open read/write handle on the memory file
    file: File,

    /// Current file length in bytes
    file_len: u64,

    /// Unused ranges inside the file, ordered by offset
    free_list: FreeList,

    /// What a release at end-of-file truncates
    tail_release: TailRelease,
}

impl MemManager {
    /// Create a memory file, discarding any previous contents
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        debug!(path = %path.display(), "created memory file");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_len: 0,
            free_list: FreeList::new(),
            tail_release: TailRelease::default(),
        })
    }

    /// Open an existing memory file with a previously saved free list
    pub fn open(path: &Path, free_list: FreeList) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let file_len = file.metadata()?.len();

        debug!(
            path = %path.display(),
            file_len,
            free_blocks = free_list.len(),
            "opened memory file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_len,
            free_list,
            tail_release: TailRelease::default(),
        })
    }

    /// Set what a release at end-of-file truncates
    pub fn with_tail_release(mut self, mode: TailRelease) -> Self {
        self.tail_release = mode;
        self
    }

    /// Store a sequence and return a handle to it
    ///
    /// `length` is recorded in the handle as-is; the byte extent written is
    /// `ceil(sequence.len() / 4)`.
    pub fn insert(&mut self, sequence: &str, length: u32) -> Result<Handle> {
        let packed = codec::encode(sequence);
        let size = packed.len() as u64;

        self.preserving_cursor(|manager| {
            // The free list is only committed once the bytes are on disk
            let fit = manager.free_list.first_fit(size);
            let position = match fit {
                Some(index) => manager.free_list.blocks()[index].position,
                None => manager.file_len,
            };

            manager.file.seek(SeekFrom::Start(position))?;
            manager.file.write_all(&packed)?;

            match fit {
                Some(index) => {
                    manager.free_list.consume(index, size);
                    debug!(position, size, "placed record in free block");
                }
                None => debug!(position, size, "appended record"),
            }
            manager.file_len = manager.file_len.max(position + size);

            Ok(Handle::new(position, length))
        })
    }

    /// Release the bytes behind a handle
    ///
    /// A released tail shrinks the file to the start of the record; with
    /// `TailRelease::Cascade` it also shrinks through any free block that
    /// becomes the new tail. Anything else joins the free list and merges
    /// with adjacent free blocks.
    pub fn release(&mut self, handle: Handle) -> Result<()> {
        if self.file_len == 0 {
            return Err(DnaDbError::EmptyStore);
        }

        self.preserving_cursor(|manager| {
            let block = FreeBlock::new(handle.position, handle.byte_len());
            if block.len == 0 {
                return Ok(());
            }

            if block.end() == manager.file_len {
                let mut new_len = block.position;
                if manager.tail_release == TailRelease::Cascade {
                    while let Some(tail) = manager.free_list.pop_tail(new_len) {
                        new_len = tail.position;
                    }
                }

                manager.file.set_len(new_len)?;
                debug!(from = manager.file_len, to = new_len, "truncated memory file");
                manager.file_len = new_len;
            } else {
                manager.free_list.release(block);
                debug!(position = block.position, len = block.len, "released block to free list");
            }

            Ok(())
        })
    }

    /// Read back the packed bytes of a record
    pub fn get_sequence(&self, handle: Handle) -> Result<Vec<u8>> {
        let mut file = &self.file;
        let saved = file.stream_position()?;

        let mut bytes = vec![0u8; handle.byte_len() as usize];
        let outcome = file
            .seek(SeekFrom::Start(handle.position))
            .and_then(|_| file.read_exact(&mut bytes));

        file.seek(SeekFrom::Start(saved))?;
        outcome?;

        Ok(bytes)
    }

    /// Read and decode a record
    pub fn read_symbols(&self, handle: Handle) -> Result<String> {
        let bytes = self.get_sequence(handle)?;
        Ok(codec::decode(&bytes, handle.length as usize))
    }

    /// Flush file contents to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Current length of the memory file
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Current position of the file cursor
    pub fn cursor(&mut self) -> Result<u64> {
        Ok(self.file.stream_position()?)
    }

    /// Move the file cursor
    pub fn set_cursor(&mut self, position: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn tail_release(&self) -> TailRelease {
        self.tail_release
    }

    pub fn free_list(&self) -> &FreeList {
        &self.free_list
    }

    /// Direct access to the free list (tooling and tests)
    pub fn free_list_mut(&mut self) -> &mut FreeList {
        &mut self.free_list
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run `op`, then put the cursor back where it was, on success and on
    /// error alike
    fn preserving_cursor<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = self.file.stream_position()?;
        let outcome = op(self);
        self.file.seek(SeekFrom::Start(saved))?;
        outcome
    }
}
