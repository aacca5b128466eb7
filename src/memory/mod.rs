//! Memory Module
//!
//! Disk-backed byte allocator for packed sequences.
//!
//! ## Responsibilities
//! - Own the single memory file and every byte range in it
//! - Place records first-fit over an offset-ordered free list
//! - Coalesce adjacent free ranges on release
//! - Shrink the file when its tail is released
//!
//! ## File Layout
//! ```text
//! ┌──────────┬──────────┬────────┬──────────────┬──────────┐
//! │ record   │ record   │ (free) │ record       │ record   │ EOF
//! └──────────┴──────────┴────────┴──────────────┴──────────┘
//!  ▲ Handle{0, n}        ▲ FreeBlock{pos, len}
//! ```
//! No header and no framing: liveness lives only in the handles held by
//! the caller and in the free list.

mod free_list;
mod handle;
mod manager;

pub use free_list::{FreeBlock, FreeList};
pub use handle::Handle;
pub use manager::MemManager;
