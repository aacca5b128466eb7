//! Table entries and slot states

use serde::{Deserialize, Serialize};

use crate::memory::Handle;

/// A live index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Handle to the packed identifier
    pub id: Handle,

    /// Handle to the packed sequence
    pub sequence: Handle,

    /// Slot this entry occupies
    pub slot: usize,
}

/// State of one table slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slot {
    /// Never occupied; ends a probe
    #[default]
    Empty,

    /// Previously occupied; free for insertion but probed through
    Tombstone,

    /// Holds a live entry
    Occupied(TableEntry),
}

impl Slot {
    /// Whether an insert may claim this slot
    pub fn is_available(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }

    pub fn entry(&self) -> Option<&TableEntry> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}
