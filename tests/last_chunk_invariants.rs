//! Last Chunk Invariant Tests
//!
//! Tests for:
//! - exactly one chunk of a complete sequence is last
//! - a maximal position short of the content size is not last
//! - zero or unknown content size falls back to position only
//! - two distinct chunks at the maximal position are reported, never
//!   resolved silently

use chunkmeta::chunk::{ChunkHash, ChunkId, ChunkRecord};
use chunkmeta::content::{add_chunk, create_content, ContainerId, ContentRecord};
use chunkmeta::errors::MetaError;
use chunkmeta::sequence::{check_sequence, is_last_chunk, last_chunk};

// =============================================================================
// Test Utilities
// =============================================================================

fn chunk(n: u32, position: u32, size: i64) -> ChunkRecord {
    ChunkRecord::new(
        ChunkId::new(format!("10.0.0.{}:6000", n % 250), "/data", format!("{:064X}", n)).unwrap(),
        ChunkHash([n as u8; 16]),
        size,
        position,
    )
}

fn content_of(size: i64, chunks: &[ChunkRecord]) -> ContentRecord {
    let declared = chunks.len() as u32;
    let mut content = create_content(ContainerId([3; 32]), 0, declared, 0, "v/o").unwrap();
    content.size = size;
    for c in chunks {
        add_chunk(&mut content, c);
    }
    content
}

// =============================================================================
// Complete sequences
// =============================================================================

#[test]
fn test_exactly_one_last_chunk_in_complete_sequence() {
    for count in 1..=8u32 {
        let chunks: Vec<ChunkRecord> = (0..count).map(|p| chunk(p + 1, p, 1024)).collect();
        let content = content_of(i64::from(count) * 1024, &chunks);

        let lasts: Vec<u32> = chunks
            .iter()
            .filter(|c| is_last_chunk(c, &content).unwrap())
            .map(|c| c.position)
            .collect();
        assert_eq!(lasts, vec![count - 1], "count {}", count);
        assert!(check_sequence(&content).complete);
    }
}

#[test]
fn test_insertion_order_is_irrelevant() {
    let chunks = [chunk(3, 2, 4), chunk(1, 0, 8), chunk(2, 1, 8)];
    let content = content_of(20, &chunks);
    assert_eq!(last_chunk(&content).unwrap(), Some(&chunks[0]));
}

#[test]
fn test_short_final_chunk_still_reaches_size() {
    let chunks = [chunk(1, 0, 4096), chunk(2, 1, 4096), chunk(3, 2, 17)];
    let content = content_of(8209, &chunks);
    assert!(is_last_chunk(&chunks[2], &content).unwrap());
}

#[test]
fn test_largest_sizes_are_handled_without_overflow() {
    let chunks = [chunk(1, 0, i64::MAX), chunk(2, 1, i64::MAX)];
    let content = content_of(i64::MAX, &chunks);
    assert!(is_last_chunk(&chunks[1], &content).unwrap());

    let content = content_of(i64::MAX, &[chunk(1, 0, i64::MAX), chunk(2, 1, 1)]);
    let report = check_sequence(&content);
    assert_eq!(report.bytes_covered, i64::MAX);
    assert!(!report.complete);
}

// =============================================================================
// Incomplete sequences
// =============================================================================

#[test]
fn test_max_position_short_of_size_is_not_last() {
    let chunks = [chunk(1, 0, 100), chunk(2, 1, 100)];
    let content = content_of(500, &chunks);
    assert!(!is_last_chunk(&chunks[1], &content).unwrap());
    assert_eq!(last_chunk(&content).unwrap(), None);

    let report = check_sequence(&content);
    assert!(!report.complete);
    assert_eq!(report.bytes_covered, 200);
}

#[test]
fn test_unknown_size_uses_position_only() {
    let chunks = [chunk(1, 0, 100), chunk(2, 1, 100)];
    for size in [0, -1] {
        let content = content_of(size, &chunks);
        assert!(is_last_chunk(&chunks[1], &content).unwrap());
        assert!(!is_last_chunk(&chunks[0], &content).unwrap());
    }
}

#[test]
fn test_repeated_chunk_does_not_inflate_offset() {
    let a = chunk(1, 0, 4);
    let b = chunk(2, 2, 4);
    let content = content_of(12, &[a.clone(), a, b.clone()]);

    assert!(!is_last_chunk(&b, &content).unwrap());
    assert_eq!(last_chunk(&content).unwrap(), None);

    let report = check_sequence(&content);
    assert_eq!(report.bytes_covered, 8);
    assert!(!report.complete);
}

// =============================================================================
// Duplicate positions
// =============================================================================

#[test]
fn test_duplicate_max_position_is_an_error() {
    let chunks = [chunk(1, 0, 10), chunk(2, 1, 10), chunk(3, 1, 10)];
    let content = content_of(20, &chunks);

    for c in &chunks {
        let err = is_last_chunk(c, &content).unwrap_err();
        assert_eq!(err.code(), "META_DUPLICATE_POSITION");
        assert!(matches!(err, MetaError::DuplicatePosition { position: 1, .. }));
    }
    assert!(last_chunk(&content).is_err());
    assert_eq!(check_sequence(&content).duplicates, vec![1]);
}

#[test]
fn test_duplicate_below_max_does_not_block_last() {
    let chunks = [chunk(1, 0, 10), chunk(2, 0, 10), chunk(3, 1, 10)];
    let content = content_of(20, &chunks);
    assert!(is_last_chunk(&chunks[2], &content).unwrap());
    assert!(!check_sequence(&content).complete);
}
