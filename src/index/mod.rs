//! Index Module
//!
//! Fixed-capacity hash index from sequence identifiers to memory handles.
//!
//! ## Layout
//! ```text
//!  slot:  0                 31 32                63 ...
//!        ┌───────────────────┬───────────────────┬────
//!        │     bucket 0      │     bucket 1      │
//!        └───────────────────┴───────────────────┴────
//! ```
//! Insertion probes linearly from the home slot, wrapping inside its
//! 32-slot bucket; if the bucket is full it falls back to a table-wide scan.
//! Deleted slots become tombstones and are never returned to empty, so a
//! probe can stop at the first empty slot. The table never resizes.

mod entry;
mod hash;
mod table;

pub use entry::{Slot, TableEntry};
pub use hash::sfold;
pub use table::{BucketHash, Probe, BUCKET_SIZE};
