//! # dnadb
//!
//! A single-file storage engine for DNA sequences:
//! - 2-bit-per-symbol packing of A/C/G/T sequences
//! - First-fit byte allocator with free-block coalescing
//! - Fixed-capacity bucketed hash index with tombstone deletion
//! - Checksummed index snapshots for reopening a memory file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command File / CLI                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                              │
//! │          (validation, duplicate ids, one mutex)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ BucketHash  │          │ MemManager  │
//!   │ id → handles│          │ (free list) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ memory file │
//!                           │ (2-bit DNA) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod memory;
pub mod index;
pub mod snapshot;
pub mod commands;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DnaDbError, Result};
pub use config::{Config, FallbackScan, OpenMode, TailRelease};
pub use engine::{CommandOutput, Engine, InsertOutcome, Report};
pub use index::BucketHash;
pub use memory::{Handle, MemManager};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dnadb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
