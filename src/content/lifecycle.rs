//! Creation, assembly and release of content aggregates
//!
//! A `ContentRecord` owns its chunks and properties by value, so releasing
//! the content releases everything it holds. `destroy_content` takes the
//! content by value: using it afterwards does not compile.

use crate::chunk::{ChunkHash, ChunkId, ChunkRecord};
use crate::errors::{Field, MetaError, MetaResult};
use crate::observability::{log_event, Event, Severity};

use super::record::{check_path, ContainerId, ContentRecord, MAX_PATH_LEN};

/// What `destroy_content` released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Released {
    pub chunks: usize,
    pub properties: usize,
}

/// Allocates a content with no chunks and no properties.
pub fn create_content(
    container_id: ContainerId,
    size: i64,
    chunk_count: u32,
    flags: u32,
    path: impl Into<String>,
) -> MetaResult<ContentRecord> {
    let path = path.into();
    if size < 0 {
        return Err(MetaError::invalid_component(
            Field::Size,
            format!("negative content size {}", size),
        ));
    }
    check_path(&path, MAX_PATH_LEN)?;

    Ok(ContentRecord {
        container_id,
        path,
        size,
        chunk_count,
        flags,
        storage_policy: None,
        version: None,
        properties: Default::default(),
        chunks: Vec::new(),
    })
}

/// Builds a raw chunk record.
pub fn create_chunk(
    id: ChunkId,
    hash: ChunkHash,
    flags: u32,
    size: i64,
    position: u32,
) -> MetaResult<ChunkRecord> {
    if size < 0 {
        return Err(MetaError::invalid_component(
            Field::Size,
            format!("negative chunk size {}", size),
        ));
    }
    Ok(ChunkRecord::new(id, hash, size, position).with_flags(flags))
}

/// Stores a copy of `chunk` in the content.
///
/// Insertion order is irrelevant. A chunk whose position is already taken is
/// accepted so that partial sets can be staged; `sequence` reports the
/// duplicate when the set is analyzed.
pub fn add_chunk(content: &mut ContentRecord, chunk: &ChunkRecord) {
    content.chunks.push(chunk.clone());
    log_event(
        Severity::Trace,
        Event::ChunkAdded,
        &[
            ("chunk", &chunk.id.to_string()),
            ("path", &content.path),
            ("position", &chunk.position.to_string()),
        ],
    );
}

/// Sets a property, returning the value it replaced.
pub fn set_property(
    content: &mut ContentRecord,
    key: impl Into<String>,
    value: impl Into<String>,
) -> Option<String> {
    content.properties.insert(key.into(), value.into())
}

/// Releases the content together with every chunk and property it owns.
///
/// Never fails, including on an empty content.
pub fn destroy_content(content: ContentRecord) -> Released {
    let ContentRecord {
        path,
        chunks,
        properties,
        ..
    } = content;
    let released = Released {
        chunks: chunks.len(),
        properties: properties.len(),
    };
    drop(chunks);
    drop(properties);

    log_event(
        Severity::Trace,
        Event::ContentReleased,
        &[
            ("chunks", &released.chunks.to_string()),
            ("path", &path),
            ("properties", &released.properties.to_string()),
        ],
    );
    released
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_id(n: u32) -> ChunkId {
        ChunkId::new("10.0.0.1:6000", "/vol", format!("{:064X}", n)).unwrap()
    }

    #[test]
    fn test_create_content_shell() {
        let content = create_content(ContainerId::default(), 0, 0, 0, "empty.bin").unwrap();
        assert!(content.chunks.is_empty());
        assert!(content.properties.is_empty());
    }

    #[test]
    fn test_create_content_rejects_invalid() {
        assert!(create_content(ContainerId::default(), -1, 0, 0, "a").is_err());
        assert!(create_content(ContainerId::default(), 0, 0, 0, "").is_err());
        let long = "x".repeat(MAX_PATH_LEN + 1);
        assert!(create_content(ContainerId::default(), 0, 0, 0, long).is_err());
    }

    #[test]
    fn test_add_chunk_copies() {
        let mut content = create_content(ContainerId::default(), 10, 1, 0, "a").unwrap();
        let mut chunk = create_chunk(chunk_id(1), ChunkHash::default(), 0, 10, 0).unwrap();
        add_chunk(&mut content, &chunk);
        chunk.size = 99;
        assert_eq!(content.chunks[0].size, 10);
    }

    #[test]
    fn test_add_chunk_accepts_duplicate_position() {
        let mut content = create_content(ContainerId::default(), 10, 2, 0, "a").unwrap();
        add_chunk(&mut content, &create_chunk(chunk_id(1), ChunkHash::default(), 0, 5, 0).unwrap());
        add_chunk(&mut content, &create_chunk(chunk_id(2), ChunkHash::default(), 0, 5, 0).unwrap());
        assert_eq!(content.chunks.len(), 2);
    }

    #[test]
    fn test_set_property_keeps_keys_unique() {
        let mut content = create_content(ContainerId::default(), 0, 0, 0, "a").unwrap();
        assert_eq!(set_property(&mut content, "k", "v1"), None);
        assert_eq!(set_property(&mut content, "k", "v2"), Some("v1".to_string()));
        assert_eq!(content.properties.len(), 1);
    }

    #[test]
    fn test_destroy_reports_released() {
        let mut content = create_content(ContainerId::default(), 0, 0, 0, "a").unwrap();
        assert_eq!(destroy_content(content.clone()), Released::default());

        add_chunk(&mut content, &create_chunk(chunk_id(1), ChunkHash::default(), 0, 1, 0).unwrap());
        set_property(&mut content, "k", "v");
        assert_eq!(
            destroy_content(content),
            Released {
                chunks: 1,
                properties: 1
            }
        );
    }

    #[test]
    fn test_create_chunk_rejects_negative_size() {
        let err = create_chunk(chunk_id(1), ChunkHash::default(), 0, -1, 0).unwrap_err();
        assert_eq!(err.field(), Some(Field::Size));
    }
}
