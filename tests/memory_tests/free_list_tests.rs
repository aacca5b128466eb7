//! Tests for FreeList
//!
//! These tests verify:
//! - First-fit allocation (exact fit removes, larger fit shrinks)
//! - Finding a fit separately from taking it
//! - Ordered insertion on release
//! - Coalescing with left, right and both neighbours
//! - Tail removal used after file truncation

use dnadb::memory::{FreeBlock, FreeList};

fn list_of(blocks: &[(u64, u64)]) -> FreeList {
    FreeList::from_blocks(blocks.iter().map(|&(position, len)| FreeBlock::new(position, len)))
}

fn blocks(list: &FreeList) -> Vec<(u64, u64)> {
    list.iter().map(|b| (b.position, b.len)).collect()
}

// =============================================================================
// Allocation Tests
// =============================================================================

#[test]
fn test_allocate_from_empty_list() {
    let mut list = FreeList::new();
    assert_eq!(list.allocate(1), None);
}

#[test]
fn test_allocate_exact_fit_removes_block() {
    let mut list = list_of(&[(0, 1), (5, 2)]);

    assert_eq!(list.allocate(2), Some(5));
    assert_eq!(blocks(&list), vec![(0, 1)]);
}

#[test]
fn test_allocate_is_first_fit_not_best_fit() {
    let mut list = list_of(&[(0, 8), (20, 2)]);

    // A best-fit allocator would pick (20, 2)
    assert_eq!(list.allocate(2), Some(0));
    assert_eq!(blocks(&list), vec![(2, 6), (20, 2)]);
}

#[test]
fn test_allocate_shrinks_larger_block() {
    let mut list = list_of(&[(5, 2)]);

    assert_eq!(list.allocate(1), Some(5));
    assert_eq!(blocks(&list), vec![(6, 1)]);

    assert_eq!(list.allocate(1), Some(6));
    assert!(list.is_empty());
}

#[test]
fn test_allocate_too_large() {
    let mut list = list_of(&[(0, 1), (5, 2)]);

    assert_eq!(list.allocate(4), None);
    assert_eq!(blocks(&list), vec![(0, 1), (5, 2)]);
}

#[test]
fn test_allocate_zero_bytes() {
    let mut list = list_of(&[(0, 1)]);

    assert_eq!(list.allocate(0), None);
    assert_eq!(list.len(), 1);
}

#[test]
fn test_first_fit_does_not_take_block() {
    let mut list = list_of(&[(0, 1), (5, 4)]);

    assert_eq!(list.first_fit(2), Some(1));
    assert_eq!(blocks(&list), vec![(0, 1), (5, 4)]);

    assert_eq!(list.consume(1, 2), 5);
    assert_eq!(blocks(&list), vec![(0, 1), (7, 2)]);
    assert_eq!(list.first_fit(3), None);
}

// =============================================================================
// Release / Coalesce Tests
// =============================================================================

#[test]
fn test_release_keeps_offset_order() {
    let mut list = FreeList::new();
    list.release(FreeBlock::new(20, 2));
    list.release(FreeBlock::new(0, 1));
    list.release(FreeBlock::new(10, 3));

    assert_eq!(blocks(&list), vec![(0, 1), (10, 3), (20, 2)]);
    assert!(list.is_coalesced());
}

#[test]
fn test_release_merges_left() {
    let mut list = list_of(&[(0, 2)]);
    list.release(FreeBlock::new(2, 3));

    assert_eq!(blocks(&list), vec![(0, 5)]);
}

#[test]
fn test_release_merges_right() {
    let mut list = list_of(&[(5, 2)]);
    list.release(FreeBlock::new(3, 2));

    assert_eq!(blocks(&list), vec![(3, 4)]);
}

#[test]
fn test_release_merges_both_sides() {
    let mut list = list_of(&[(0, 2), (3, 4), (20, 1)]);
    list.release(FreeBlock::new(2, 1));

    assert_eq!(blocks(&list), vec![(0, 7), (20, 1)]);
    assert!(list.is_coalesced());
}

#[test]
fn test_release_non_adjacent_stays_separate() {
    let mut list = list_of(&[(0, 2)]);
    list.release(FreeBlock::new(3, 1));

    assert_eq!(blocks(&list), vec![(0, 2), (3, 1)]);
}

#[test]
fn test_release_zero_length_ignored() {
    let mut list = FreeList::new();
    list.release(FreeBlock::new(4, 0));

    assert!(list.is_empty());
}

#[test]
fn test_total_free() {
    let list = list_of(&[(0, 2), (10, 3)]);
    assert_eq!(list.total_free(), 5);
}

// =============================================================================
// Tail Tests
// =============================================================================

#[test]
fn test_pop_tail_only_when_touching_eof() {
    let mut list = list_of(&[(0, 1), (8, 2)]);

    assert_eq!(list.pop_tail(12), None);
    assert_eq!(list.pop_tail(10), Some(FreeBlock::new(8, 2)));
    assert_eq!(blocks(&list), vec![(0, 1)]);
}
