//! Error types for dnadb
//!
//! Provides a unified error type for all operations. Index-full and
//! key-not-found are not errors: they surface as `Option`/outcome values.

use thiserror::Error;

/// Result type alias using DnaDbError
pub type Result<T> = std::result::Result<T, DnaDbError>;

/// Unified error type for dnadb operations
#[derive(Debug, Error)]
pub enum DnaDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Memory Manager Errors
    // -------------------------------------------------------------------------
    #[error("Memory file is empty, nothing to release")]
    EmptyStore,

    // -------------------------------------------------------------------------
    // Hash Index Errors
    // -------------------------------------------------------------------------
    #[error("Invalid hash table capacity {0}: must be a positive multiple of 32")]
    InvalidCapacity(usize),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid sequence: {0:?}")]
    InvalidSequence(String),

    #[error("Command error: {0}")]
    Command(String),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for DnaDbError {
    fn from(err: bincode::Error) -> Self {
        DnaDbError::Serialization(err.to_string())
    }
}
