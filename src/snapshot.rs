//! Index snapshots
//!
//! The memory file is not self-describing, so the index and free list are
//! saved alongside it to allow reopening a database.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (10 bytes)                                       │
//! │   Magic: "DNAH" (4) | Version: u16 (2) | Len: u32 (4)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (Len bytes, bincode)                            │
//! │   slots | free blocks | memory file length              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                        │
//! │   PayloadCRC: u32                                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers little-endian.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DnaDbError, Result};
use crate::index::{BucketHash, Slot};
use crate::memory::{FreeBlock, MemManager};

/// Magic bytes identifying a dnadb snapshot
pub const MAGIC: &[u8; 4] = b"DNAH";

/// Current snapshot format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + PayloadLen (4) = 10 bytes
pub const HEADER_SIZE: usize = 10;

/// Footer size: PayloadCRC (4)
pub const FOOTER_SIZE: usize = 4;

/// Saved state of an index and its memory manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every slot of the index, in order
    pub slots: Vec<Slot>,

    /// Free list of the memory manager
    pub free_blocks: Vec<FreeBlock>,

    /// Memory file length at the time of capture
    pub memory_file_len: u64,
}

impl Snapshot {
    /// Capture the current state
    pub fn capture(index: &BucketHash, memory: &MemManager) -> Self {
        Self {
            slots: index.slots().to_vec(),
            free_blocks: memory.free_list().blocks().to_vec(),
            memory_file_len: memory.file_len(),
        }
    }

    /// Number of index slots recorded
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Write the snapshot, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        let payload = bincode::serialize(self)?;
        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            DnaDbError::Serialization(format!("snapshot payload too large: {} bytes", payload.len()))
        })?;
        let crc = crc32fast::hash(&payload);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&payload_len.to_le_bytes())?;
        writer.write_all(&payload)?;
        writer.write_all(&crc.to_le_bytes())?;

        let file = writer.into_inner().map_err(|e| DnaDbError::Io(e.into_error()))?;
        file.sync_all()?;

        tracing::debug!(path = %path.display(), bytes = payload.len(), "wrote snapshot");
        Ok(())
    }

    /// Read and verify a snapshot
    pub fn read(path: &Path) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;

        if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "file too short: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "invalid magic: expected DNAH, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "unsupported version: {}",
                version
            )));
        }

        let payload_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        if bytes.len() != HEADER_SIZE + payload_len + FOOTER_SIZE {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "payload length {} does not match file size {}",
                payload_len,
                bytes.len()
            )));
        }

        let payload = &bytes[HEADER_SIZE..HEADER_SIZE + payload_len];
        let footer = &bytes[HEADER_SIZE + payload_len..];
        let stored_crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
        let actual_crc = crc32fast::hash(payload);

        if stored_crc != actual_crc {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "CRC mismatch: stored {:08x}, computed {:08x}",
                stored_crc, actual_crc
            )));
        }

        Ok(bincode::deserialize(payload)?)
    }
}
