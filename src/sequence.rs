//! Structural queries over a content's chunk set
//!
//! Nothing here mutates; every function reads an immutable snapshot of the
//! content and may be called from several threads at once.
//!
//! The byte offset implied by a chunk's position is the sum of the sizes of
//! the distinct chunks with a strictly smaller position, accumulated without
//! overflow. A content size below zero means the size is unknown.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::chunk::{ChunkId, ChunkRecord};
use crate::content::ContentRecord;
use crate::errors::{MetaError, MetaResult};
use crate::observability::{log_event, Event, Severity};

fn duplicate_error(position: u32, first: &ChunkId, second: &ChunkId) -> MetaError {
    log_event(
        Severity::Warn,
        Event::DuplicatePosition,
        &[
            ("first", &first.to_string()),
            ("position", &position.to_string()),
            ("second", &second.to_string()),
        ],
    );
    MetaError::DuplicatePosition {
        position,
        first: first.to_string(),
        second: second.to_string(),
    }
}

/// The content's chunks in insertion order, each identifier kept once.
fn distinct_chunks(content: &ContentRecord) -> Vec<&ChunkRecord> {
    let mut seen: BTreeSet<&ChunkId> = BTreeSet::new();
    let mut chunks = Vec::with_capacity(content.chunks.len());
    for chunk in &content.chunks {
        if seen.insert(&chunk.id) {
            chunks.push(chunk);
        }
    }
    chunks
}

/// Sum of chunk sizes, wide enough that no set of `i64` sizes overflows it.
fn total_size<'a>(chunks: impl IntoIterator<Item = &'a ChunkRecord>) -> i128 {
    chunks.into_iter().map(|c| i128::from(c.size)).sum()
}

/// Tells whether `chunk` ends the chunk sequence of `content`.
///
/// A chunk is last when no other chunk of the content has a greater position
/// and, if the content size is known and non-zero, its offset plus its size
/// reaches the content size. Fails with `DuplicatePosition` when the maximal
/// position is held by two distinct chunks.
pub fn is_last_chunk(chunk: &ChunkRecord, content: &ContentRecord) -> MetaResult<bool> {
    // Content order, one entry per identifier, `chunk` standing in for its own copies.
    let mut candidates: Vec<&ChunkRecord> = Vec::with_capacity(content.chunks.len() + 1);
    let mut owned = false;
    for c in distinct_chunks(content) {
        if c.id != chunk.id {
            candidates.push(c);
        } else {
            candidates.push(chunk);
            owned = true;
        }
    }
    if !owned {
        candidates.push(chunk);
    }

    let max_position = candidates
        .iter()
        .map(|c| c.position)
        .max()
        .unwrap_or(chunk.position);

    let mut holder: Option<&ChunkRecord> = None;
    for &c in candidates.iter().filter(|c| c.position == max_position) {
        match holder {
            None => holder = Some(c),
            Some(h) if h.id != c.id => return Err(duplicate_error(max_position, &h.id, &c.id)),
            Some(_) => {}
        }
    }

    if chunk.position < max_position {
        return Ok(false);
    }
    if content.size <= 0 {
        return Ok(true);
    }
    let offset = total_size(
        candidates
            .iter()
            .copied()
            .filter(|c| c.position < chunk.position),
    );
    Ok(offset + i128::from(chunk.size) >= i128::from(content.size))
}

/// Returns the chunk that ends the sequence, if any.
pub fn last_chunk(content: &ContentRecord) -> MetaResult<Option<&ChunkRecord>> {
    let Some(top) = content.chunks.iter().max_by_key(|c| c.position) else {
        return Ok(None);
    };
    match is_last_chunk(top, content)? {
        true => Ok(Some(top)),
        false => Ok(None),
    }
}

fn chunks_by_position(content: &ContentRecord) -> BTreeMap<u32, Vec<&ChunkRecord>> {
    let mut by_position: BTreeMap<u32, Vec<&ChunkRecord>> = BTreeMap::new();
    for chunk in distinct_chunks(content) {
        by_position.entry(chunk.position).or_default().push(chunk);
    }
    by_position
}

/// Positions in `0..=max_position` that no chunk occupies.
pub fn missing_positions(content: &ContentRecord) -> Vec<u32> {
    let by_position = chunks_by_position(content);
    let Some(&max) = by_position.keys().next_back() else {
        return Vec::new();
    };
    (0..=max).filter(|p| !by_position.contains_key(p)).collect()
}

/// Positions held by more than one distinct chunk.
pub fn duplicate_positions(content: &ContentRecord) -> Vec<u32> {
    chunks_by_position(content)
        .into_iter()
        .filter(|(_, chunks)| chunks.len() > 1)
        .map(|(position, _)| position)
        .collect()
}

/// Chunks ordered by position; ties keep insertion order.
pub fn sorted_chunks(content: &ContentRecord) -> Vec<&ChunkRecord> {
    let mut chunks: Vec<&ChunkRecord> = content.chunks.iter().collect();
    chunks.sort_by_key(|c| c.position);
    chunks
}

/// Structural summary of a chunk set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    pub chunk_count_declared: u32,
    pub chunk_count_actual: usize,
    pub missing: Vec<u32>,
    pub duplicates: Vec<u32>,
    /// Sum of distinct chunk sizes, saturating at `i64::MAX`
    pub bytes_covered: i64,
    pub complete: bool,
}

/// Checks the chunk set for gaps, duplicates, count and size agreement.
///
/// A chunk added more than once counts once.
pub fn check_sequence(content: &ContentRecord) -> SequenceReport {
    let missing = missing_positions(content);
    let duplicates = duplicate_positions(content);
    let covered = total_size(distinct_chunks(content));

    let size_ok = content.size < 0 || covered == i128::from(content.size);
    let complete = missing.is_empty()
        && duplicates.is_empty()
        && content.count_mismatch().is_none()
        && size_ok;

    SequenceReport {
        chunk_count_declared: content.chunk_count,
        chunk_count_actual: content.chunks.len(),
        missing,
        duplicates,
        bytes_covered: i64::try_from(covered).unwrap_or(i64::MAX),
        complete,
    }
}
