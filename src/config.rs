//! Configuration for dnadb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a dnadb instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Binary file holding packed identifiers and sequences
    pub memory_file: PathBuf,

    /// Where the index snapshot is written on close (and read on restore)
    pub hash_file: Option<PathBuf>,

    /// How to treat an existing memory file on open
    pub open_mode: OpenMode,

    /// What a release at the end of the memory file truncates
    pub tail_release: TailRelease,

    // -------------------------------------------------------------------------
    // Hash Index Configuration
    // -------------------------------------------------------------------------
    /// Number of slots in the hash index (positive multiple of 32)
    pub table_capacity: usize,

    /// Behaviour of the table-wide scan once a home bucket is full
    pub fallback_scan: FallbackScan,
}

/// Table-wide scan used when the 32-slot home bucket has no free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackScan {
    /// Scan from the home slot to the end of the table, no wrap
    #[default]
    Forward,

    /// Scan from the home slot, wrapping to slot 0 (higher load tolerance,
    /// different slot assignments than `Forward`)
    Wrapping,
}

/// Truncation applied when a released record ends at end-of-file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailRelease {
    /// Truncate exactly the released range; the free list is untouched
    #[default]
    Exact,

    /// Also truncate through any free block that becomes the new tail, so
    /// no free block ever ends at end-of-file
    Cascade,
}

/// Open mode for the memory file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Reset the memory file to zero length
    #[default]
    Truncate,

    /// Keep the memory file and rebuild state from the snapshot in `hash_file`
    Restore,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_file: PathBuf::from("memory.bin"),
            hash_file: None,
            open_mode: OpenMode::Truncate,
            tail_release: TailRelease::Exact,
            table_capacity: 64,
            fallback_scan: FallbackScan::Forward,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the memory file path
    pub fn memory_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.memory_file = path.into();
        self
    }

    /// Set the snapshot path
    pub fn hash_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.hash_file = Some(path.into());
        self
    }

    /// Set the open mode
    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.config.open_mode = mode;
        self
    }

    /// Set the tail release behaviour
    pub fn tail_release(mut self, mode: TailRelease) -> Self {
        self.config.tail_release = mode;
        self
    }

    /// Set the hash table capacity (in slots)
    pub fn table_capacity(mut self, capacity: usize) -> Self {
        self.config.table_capacity = capacity;
        self
    }

    /// Set the fallback scan strategy
    pub fn fallback_scan(mut self, scan: FallbackScan) -> Self {
        self.config.fallback_scan = scan;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
