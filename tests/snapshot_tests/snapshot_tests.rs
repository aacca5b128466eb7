//! Tests for index snapshots
//!
//! These tests verify:
//! - Write/read preserves slots, free list and file length
//! - Corruption detection (magic, version, CRC, truncation)

use std::fs;
use std::path::PathBuf;

use dnadb::index::BucketHash;
use dnadb::memory::MemManager;
use dnadb::snapshot::{Snapshot, HEADER_SIZE};
use dnadb::DnaDbError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn build_snapshot(dir: &TempDir) -> Snapshot {
    let mut memory = MemManager::create(&dir.path().join("memory.bin")).unwrap();
    let mut index = BucketHash::new(64).unwrap();

    let id = memory.insert("AAAA", 4).unwrap();
    let sequence = memory.insert("ACGTACGT", 8).unwrap();
    index.insert("AAAA", id, sequence).unwrap();

    let id = memory.insert("AAA", 3).unwrap();
    let sequence = memory.insert("TTTT", 4).unwrap();
    let slot = index.insert("AAA", id, sequence).unwrap();
    memory.insert("GGGG", 4).unwrap();

    index.insert_tomb(slot);
    memory.release(sequence).unwrap();
    memory.release(id).unwrap();

    Snapshot::capture(&index, &memory)
}

fn write_snapshot(dir: &TempDir) -> (PathBuf, Snapshot) {
    let snapshot = build_snapshot(dir);
    let path = dir.path().join("hash.snap");
    snapshot.write(&path).unwrap();
    (path, snapshot)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_capture_records_state() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(&temp_dir);

    assert_eq!(snapshot.capacity(), 64);
    assert_eq!(snapshot.memory_file_len, 6);
    assert_eq!(snapshot.free_blocks.len(), 1);
    assert_eq!(snapshot.free_blocks[0].position, 3);
    assert_eq!(snapshot.free_blocks[0].len, 2);
}

#[test]
fn test_write_then_read() {
    let temp_dir = TempDir::new().unwrap();
    let (path, snapshot) = write_snapshot(&temp_dir);

    let loaded = Snapshot::read(&path).unwrap();

    assert_eq!(loaded, snapshot);
}

#[test]
fn test_write_replaces_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hash.snap");
    fs::write(&path, vec![0xAB; 4096]).unwrap();

    let snapshot = build_snapshot(&temp_dir);
    snapshot.write(&path).unwrap();

    assert_eq!(Snapshot::read(&path).unwrap(), snapshot);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_read_rejects_bad_magic() {
    let temp_dir = TempDir::new().unwrap();
    let (path, _) = write_snapshot(&temp_dir);

    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = b'X';
    fs::write(&path, bytes).unwrap();

    assert!(matches!(Snapshot::read(&path), Err(DnaDbError::SnapshotCorruption(_))));
}

#[test]
fn test_read_rejects_unknown_version() {
    let temp_dir = TempDir::new().unwrap();
    let (path, _) = write_snapshot(&temp_dir);

    let mut bytes = fs::read(&path).unwrap();
    bytes[4] = 9;
    fs::write(&path, bytes).unwrap();

    assert!(matches!(Snapshot::read(&path), Err(DnaDbError::SnapshotCorruption(_))));
}

#[test]
fn test_read_detects_flipped_payload_bit() {
    let temp_dir = TempDir::new().unwrap();
    let (path, _) = write_snapshot(&temp_dir);

    let mut bytes = fs::read(&path).unwrap();
    bytes[HEADER_SIZE + 3] ^= 0x01;
    fs::write(&path, bytes).unwrap();

    let err = Snapshot::read(&path).unwrap_err();
    assert!(err.to_string().contains("CRC mismatch"));
}

#[test]
fn test_read_rejects_truncated_file() {
    let temp_dir = TempDir::new().unwrap();
    let (path, _) = write_snapshot(&temp_dir);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

    assert!(matches!(Snapshot::read(&path), Err(DnaDbError::SnapshotCorruption(_))));

    fs::write(&path, &bytes[..5]).unwrap();
    assert!(matches!(Snapshot::read(&path), Err(DnaDbError::SnapshotCorruption(_))));
}

#[test]
fn test_read_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = Snapshot::read(&temp_dir.path().join("missing.snap"));

    assert!(matches!(result, Err(DnaDbError::Io(_))));
}
