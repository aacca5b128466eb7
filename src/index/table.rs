//! Bucket hash table
//!
//! Open-addressed table of `Slot`s with bucketed linear probing.

use tracing::{debug, warn};

use crate::config::FallbackScan;
use crate::error::{DnaDbError, Result};
use crate::memory::Handle;

use super::{sfold, Slot, TableEntry};

/// Number of contiguous slots sharing a probe neighbourhood
pub const BUCKET_SIZE: usize = 32;

/// Fixed-capacity hash index
///
/// Keys are not stored: an entry only holds handles, so matching a key
/// against an entry is left to the caller (see [`BucketHash::find`]).
#[derive(Debug, Clone)]
pub struct BucketHash {
    /// One state per slot, `capacity` long
    slots: Vec<Slot>,

    /// Number of occupied slots
    size: usize,

    /// Scan used once the home bucket is exhausted
    fallback: FallbackScan,
}

impl BucketHash {
    /// Create an empty table with the default (non-wrapping) fallback scan
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_fallback(capacity, FallbackScan::default())
    }

    /// Create an empty table with an explicit fallback scan
    pub fn with_fallback(capacity: usize, fallback: FallbackScan) -> Result<Self> {
        validate_capacity(capacity)?;

        Ok(Self {
            slots: vec![Slot::Empty; capacity],
            size: 0,
            fallback,
        })
    }

    /// Rebuild a table from saved slot states
    pub fn from_slots(slots: Vec<Slot>, fallback: FallbackScan) -> Result<Self> {
        validate_capacity(slots.len())?;

        for (index, slot) in slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                if entry.slot != index {
                    return Err(DnaDbError::SnapshotCorruption(format!(
                        "entry in slot {} claims slot {}",
                        index, entry.slot
                    )));
                }
            }
        }

        let size = slots.iter().filter(|slot| slot.entry().is_some()).count();

        Ok(Self { slots, size, fallback })
    }

    /// Home slot of a key
    pub fn hash(&self, key: &str) -> usize {
        sfold(key, self.capacity())
    }

    /// Slot indices in the order an insert of `key` would try them
    pub fn probe(&self, key: &str) -> Probe {
        Probe::new(self.hash(key), self.capacity(), self.fallback)
    }

    /// Insert an entry for `key`
    ///
    /// Claims the first empty or tombstoned slot in probe order and returns
    /// its index. Returns `None` when no slot is available; the table is
    /// left untouched in that case.
    pub fn insert(&mut self, key: &str, id: Handle, sequence: Handle) -> Option<usize> {
        let Some(slot) = self.probe(key).find(|&i| self.slots[i].is_available()) else {
            warn!(key, size = self.size, "hash table full, insert rejected");
            return None;
        };

        self.slots[slot] = Slot::Occupied(TableEntry { id, sequence, slot });
        self.size += 1;

        debug!(key, slot, home = self.hash(key), "inserted index entry");
        Some(slot)
    }

    /// Live entry at `slot`, if any
    pub fn get(&self, slot: usize) -> Option<&TableEntry> {
        self.slots.get(slot).and_then(Slot::entry)
    }

    /// Replace a live entry with a tombstone
    ///
    /// Returns the removed entry, or `None` if the slot held no live entry.
    /// The entry's handles are not released here.
    pub fn insert_tomb(&mut self, slot: usize) -> Option<TableEntry> {
        let Some(Slot::Occupied(entry)) = self.slots.get(slot).copied() else {
            return None;
        };

        self.slots[slot] = Slot::Tombstone;
        self.size -= 1;

        debug!(slot, "tombstoned index entry");
        Some(entry)
    }

    /// Find the slot holding `key`
    ///
    /// Walks the probe sequence, skipping tombstones, and asks `is_match`
    /// whether each live entry belongs to `key`. Stops at the first empty
    /// slot: no key can live past one in its own probe order.
    pub fn find<F>(&self, key: &str, mut is_match: F) -> Result<Option<usize>>
    where
        F: FnMut(&TableEntry) -> Result<bool>,
    {
        for index in self.probe(key) {
            match &self.slots[index] {
                Slot::Empty => return Ok(None),
                Slot::Tombstone => continue,
                Slot::Occupied(entry) => {
                    if is_match(entry)? {
                        return Ok(Some(index));
                    }
                }
            }
        }

        Ok(None)
    }

    /// Live entries in slot order
    pub fn entries(&self) -> impl Iterator<Item = &TableEntry> {
        self.slots.iter().filter_map(Slot::entry)
    }

    /// All slot states
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn fallback(&self) -> FallbackScan {
        self.fallback
    }
}

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 || capacity % BUCKET_SIZE != 0 {
        return Err(DnaDbError::InvalidCapacity(capacity));
    }
    Ok(())
}

// =============================================================================
// Probe Sequence
// =============================================================================

/// Iterator over the slots tried for one key
///
/// First `BUCKET_SIZE` steps walk the home bucket starting at the home slot
/// and wrapping at the bucket edge. The remaining steps scan the table from
/// the home slot: to the end for `Forward`, all the way round for
/// `Wrapping`.
#[derive(Debug, Clone)]
pub struct Probe {
    home: usize,
    bucket_start: usize,
    capacity: usize,
    fallback: FallbackScan,
    step: usize,
}

impl Probe {
    fn new(home: usize, capacity: usize, fallback: FallbackScan) -> Self {
        Self {
            home,
            bucket_start: (home / BUCKET_SIZE) * BUCKET_SIZE,
            capacity,
            fallback,
            step: 0,
        }
    }

    fn total_steps(&self) -> usize {
        match self.fallback {
            FallbackScan::Forward => BUCKET_SIZE + (self.capacity - self.home),
            FallbackScan::Wrapping => BUCKET_SIZE + self.capacity,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.step >= self.total_steps() {
            return None;
        }

        let step = self.step;
        self.step += 1;

        if step < BUCKET_SIZE {
            let offset = (self.home - self.bucket_start + step) % BUCKET_SIZE;
            return Some(self.bucket_start + offset);
        }

        Some((self.home + step - BUCKET_SIZE) % self.capacity)
    }
}
