//! Engine Module
//!
//! The DNA database engine that coordinates the memory manager and the
//! hash index.
//!
//! ## Responsibilities
//! - Validate identifiers and sequences before they reach storage
//! - Store id + sequence as two records, index them under the id
//! - Resolve ids back to sequences through the index
//! - Save/restore the index via snapshots

use std::path::Path;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::codec;
use crate::commands::Command;
use crate::config::{Config, OpenMode};
use crate::error::{DnaDbError, Result};
use crate::index::BucketHash;
use crate::memory::{FreeBlock, FreeList, MemManager};
use crate::snapshot::Snapshot;

/// Result of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored in the given slot
    Inserted { slot: usize },

    /// The id is already present in the given slot; nothing was stored
    Duplicate { slot: usize },

    /// No slot was available; nothing was stored
    TableFull,
}

/// Index contents and free list, as shown by `print`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Live `(slot, id)` pairs in slot order
    pub entries: Vec<(usize, String)>,

    /// Free blocks in position order
    pub free_blocks: Vec<FreeBlock>,
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Inserted { id: String, slot: usize },
    Duplicate { id: String },
    TableFull { id: String },
    Removed { id: String, sequence: String },
    Found { id: String, sequence: String },
    NotFound { id: String },
    Report(Report),
}

/// The database engine
///
/// ## Concurrency
/// Offset bookkeeping in the memory manager and probing in the index are
/// not safe under interleaved mutation, so both live behind one mutex and
/// every operation (reads included, since they move the file cursor) holds
/// it for its whole duration.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Memory manager + index, serialized together
    state: Mutex<State>,
}

struct State {
    memory: MemManager,
    index: BucketHash,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// `OpenMode::Truncate` starts from an empty memory file and index.
    /// `OpenMode::Restore` reopens the memory file and rebuilds the index
    /// and free list from the snapshot in `hash_file`.
    pub fn open(config: Config) -> Result<Self> {
        let state = match config.open_mode {
            OpenMode::Truncate => State {
                index: BucketHash::with_fallback(config.table_capacity, config.fallback_scan)?,
                memory: MemManager::create(&config.memory_file)?
                    .with_tail_release(config.tail_release),
            },
            OpenMode::Restore => Self::restore(&config)?,
        };

        info!(
            memory_file = %config.memory_file.display(),
            capacity = state.index.capacity(),
            entries = state.index.size(),
            mode = ?config.open_mode,
            "engine opened"
        );

        Ok(Self {
            config,
            state: Mutex::new(state),
        })
    }

    /// Open a fresh engine on a memory file (convenience method)
    ///
    /// Uses default config with the given memory file and table capacity
    pub fn open_path(memory_file: &Path, table_capacity: usize) -> Result<Self> {
        let config = Config::builder()
            .memory_file(memory_file)
            .table_capacity(table_capacity)
            .build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<CommandOutput> {
        match command {
            Command::Insert { id, length, sequence } => {
                if length != sequence.len() {
                    warn!(
                        id = %id,
                        declared = length,
                        actual = sequence.len(),
                        "declared length does not match sequence, using actual length"
                    );
                }

                Ok(match self.insert(&id, &sequence)? {
                    InsertOutcome::Inserted { slot } => CommandOutput::Inserted { id, slot },
                    InsertOutcome::Duplicate { .. } => CommandOutput::Duplicate { id },
                    InsertOutcome::TableFull => CommandOutput::TableFull { id },
                })
            }
            Command::Remove { id } => Ok(match self.remove(&id)? {
                Some(sequence) => CommandOutput::Removed { id, sequence },
                None => CommandOutput::NotFound { id },
            }),
            Command::Search { id } => Ok(match self.search(&id)? {
                Some(sequence) => CommandOutput::Found { id, sequence },
                None => CommandOutput::NotFound { id },
            }),
            Command::Print => Ok(CommandOutput::Report(self.report()?)),
        }
    }

    /// Store a sequence under an id
    ///
    /// Steps:
    /// 1. Validate both strings
    /// 2. Reject a duplicate id
    /// 3. Store id, then sequence, in the memory file
    /// 4. Index both handles under the id (releasing them if the table is full)
    pub fn insert(&self, id: &str, sequence: &str) -> Result<InsertOutcome> {
        let id_len = checked_length(id)?;
        let sequence_len = checked_length(sequence)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(slot) = state.locate(id)? {
            return Ok(InsertOutcome::Duplicate { slot });
        }

        let id_handle = state.memory.insert(id, id_len)?;
        let sequence_handle = match state.memory.insert(sequence, sequence_len) {
            Ok(handle) => handle,
            Err(e) => {
                state.memory.release(id_handle)?;
                return Err(e);
            }
        };

        match state.index.insert(id, id_handle, sequence_handle) {
            Some(slot) => Ok(InsertOutcome::Inserted { slot }),
            None => {
                // Sequence first: if both were appended this shrinks the file back
                state.memory.release(sequence_handle)?;
                state.memory.release(id_handle)?;
                Ok(InsertOutcome::TableFull)
            }
        }
    }

    /// Remove an id, returning the sequence it held
    pub fn remove(&self, id: &str) -> Result<Option<String>> {
        checked_length(id)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(slot) = state.locate(id)? else {
            return Ok(None);
        };
        let Some(entry) = state.index.get(slot).copied() else {
            return Ok(None);
        };

        let sequence = state.memory.read_symbols(entry.sequence)?;
        state.index.insert_tomb(slot);
        state.memory.release(entry.sequence)?;
        state.memory.release(entry.id)?;

        Ok(Some(sequence))
    }

    /// Look up the sequence stored under an id
    pub fn search(&self, id: &str) -> Result<Option<String>> {
        checked_length(id)?;

        let state = self.state.lock();

        match state.locate(id)? {
            Some(slot) => match state.index.get(slot) {
                Some(entry) => Ok(Some(state.memory.read_symbols(entry.sequence)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Slot of an id, if present
    pub fn slot_of(&self, id: &str) -> Result<Option<usize>> {
        checked_length(id)?;
        self.state.lock().locate(id)
    }

    /// Live ids and the free list
    pub fn report(&self) -> Result<Report> {
        let state = self.state.lock();

        let entries = state
            .index
            .entries()
            .map(|entry| -> Result<(usize, String)> {
                Ok((entry.slot, state.memory.read_symbols(entry.id)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Report {
            entries,
            free_blocks: state.memory.free_list().blocks().to_vec(),
        })
    }

    /// Capture the current index and free list
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot::capture(&state.index, &state.memory)
    }

    /// Sync the memory file and, if configured, write the snapshot
    pub fn checkpoint(&self) -> Result<()> {
        let state = self.state.lock();
        state.memory.sync()?;

        if let Some(hash_file) = &self.config.hash_file {
            Snapshot::capture(&state.index, &state.memory).write(hash_file)?;
        }

        Ok(())
    }

    /// Close the engine gracefully
    pub fn close(self) -> Result<()> {
        self.checkpoint()?;
        info!(memory_file = %self.config.memory_file.display(), "engine closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of stored sequences
    pub fn len(&self) -> usize {
        self.state.lock().index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of index slots
    pub fn capacity(&self) -> usize {
        self.state.lock().index.capacity()
    }

    /// Current memory file length in bytes
    pub fn memory_file_len(&self) -> u64 {
        self.state.lock().memory.file_len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn restore(config: &Config) -> Result<State> {
        let hash_file = config.hash_file.as_ref().ok_or_else(|| {
            DnaDbError::Config("restore requires a hash file".to_string())
        })?;

        let snapshot = Snapshot::read(hash_file)?;
        if snapshot.capacity() != config.table_capacity {
            return Err(DnaDbError::Config(format!(
                "snapshot has {} slots, configured capacity is {}",
                snapshot.capacity(),
                config.table_capacity
            )));
        }

        let free_list = FreeList::from_blocks(snapshot.free_blocks);
        let memory = MemManager::open(&config.memory_file, free_list)?
            .with_tail_release(config.tail_release);

        if memory.file_len() != snapshot.memory_file_len {
            return Err(DnaDbError::SnapshotCorruption(format!(
                "memory file is {} bytes, snapshot expects {}",
                memory.file_len(),
                snapshot.memory_file_len
            )));
        }
        if memory.free_list().iter().any(|block| block.end() > memory.file_len()) {
            return Err(DnaDbError::SnapshotCorruption(
                "free block extends past end of memory file".to_string(),
            ));
        }

        let index = BucketHash::from_slots(snapshot.slots, config.fallback_scan)?;
        info!(hash_file = %hash_file.display(), entries = index.size(), "restored snapshot");

        Ok(State { memory, index })
    }
}

impl State {
    /// Slot holding `id`, comparing stored id bytes against the packed key
    fn locate(&self, id: &str) -> Result<Option<usize>> {
        let packed = codec::encode(id);

        self.index.find(id, |entry| {
            if entry.id.length as usize != id.len() {
                return Ok(false);
            }
            Ok(self.memory.get_sequence(entry.id)? == packed)
        })
    }
}

/// Validate a sequence and return its length as stored in a handle
fn checked_length(sequence: &str) -> Result<u32> {
    if !codec::is_valid_sequence(sequence) {
        return Err(DnaDbError::InvalidSequence(sequence.to_string()));
    }
    u32::try_from(sequence.len()).map_err(|_| DnaDbError::InvalidSequence(sequence.to_string()))
}
