//! Chunk conversion between text and raw form

use crate::chunk::{ChunkHash, ChunkId, ChunkRecord, ChunkTextRecord};
use crate::content::ContentRecord;
use crate::errors::{Field, MetaError, MetaResult};

use super::parse::{parse_flags, parse_size, parse_u32, required};

/// Identity problems found while converting are malformed values of the
/// offending field.
fn as_malformed(err: MetaError) -> MetaError {
    match err {
        MetaError::InvalidComponent { component, reason } => MetaError::MalformedValue {
            field: component,
            reason,
        },
        other => other,
    }
}

pub(crate) fn text_to_raw(text: &ChunkTextRecord) -> MetaResult<ChunkRecord> {
    let address = required(&text.address, Field::Address)?;
    let volume = required(&text.volume, Field::Volume)?;
    let id = required(&text.id, Field::ChunkId)?;
    let hash = required(&text.hash, Field::Hash)?;
    let size = required(&text.size, Field::Size)?;
    let position = required(&text.position, Field::Position)?;

    let id = ChunkId::new(address, volume, id).map_err(as_malformed)?;
    let hash = ChunkHash::from_hex(hash)?;
    let size = parse_size(size, Field::Size)?;
    let position = parse_u32(position, Field::Position)?;
    let flags = parse_flags(&text.flags)?;

    Ok(ChunkRecord {
        id,
        hash,
        size,
        position,
        flags,
        metadata: text.metadata.clone(),
    })
}

/// Text form of `chunk`, with the content-scoped fields taken from `content`.
pub(crate) fn raw_to_text(
    chunk: &ChunkRecord,
    content: &ContentRecord,
) -> MetaResult<ChunkTextRecord> {
    if chunk.size < 0 {
        return Err(MetaError::malformed(
            Field::Size,
            format!("negative chunk size {}", chunk.size),
        ));
    }

    Ok(ChunkTextRecord {
        address: Some(chunk.id.address().to_string()),
        volume: Some(chunk.id.volume().to_string()),
        id: Some(chunk.id.id().to_string()),
        hash: Some(chunk.hash.to_hex()),
        size: Some(chunk.size.to_string()),
        position: Some(chunk.position.to_string()),
        flags: Some(chunk.flags.to_string()),
        container_id: Some(content.container_id.to_hex()),
        path: Some(content.path.clone()),
        metadata: chunk.metadata.clone(),
        extras: Default::default(),
    })
}

/// Converts the single chunk held by `content`.
pub(crate) fn single_raw_to_text(content: &ContentRecord) -> MetaResult<ChunkTextRecord> {
    match content.chunks.as_slice() {
        [chunk] => raw_to_text(chunk, content),
        chunks => Err(MetaError::AmbiguousChunk {
            found: chunks.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContainerId;

    const ID: &str = "00000000000000000000000000000000000000000000000000000000000000A1";

    fn text() -> ChunkTextRecord {
        ChunkTextRecord {
            address: Some("10.0.0.1:6004".into()),
            volume: Some("/rawx/1".into()),
            id: Some(ID.into()),
            hash: Some("00112233445566778899AABBCCDDEEFF".into()),
            size: Some("4096".into()),
            position: Some("2".into()),
            flags: Some("0".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_to_raw() {
        let raw = text_to_raw(&text()).unwrap();
        assert_eq!(raw.id.address(), "10.0.0.1:6004");
        assert_eq!(raw.size, 4096);
        assert_eq!(raw.position, 2);
        assert_eq!(raw.hash.0[15], 0xFF);
    }

    #[test]
    fn test_missing_identity_fields_are_named() {
        let cases = [
            (Field::Address, ChunkTextRecord { address: None, ..text() }),
            (Field::Volume, ChunkTextRecord { volume: None, ..text() }),
            (Field::ChunkId, ChunkTextRecord { id: None, ..text() }),
            (Field::Hash, ChunkTextRecord { hash: None, ..text() }),
            (Field::Size, ChunkTextRecord { size: None, ..text() }),
            (Field::Position, ChunkTextRecord { position: None, ..text() }),
        ];
        for (field, t) in cases {
            assert_eq!(text_to_raw(&t).unwrap_err(), MetaError::MissingField(field));
        }
    }

    #[test]
    fn test_malformed_values_are_named() {
        let mut t = text();
        t.hash = Some("XYZ".into());
        assert_eq!(text_to_raw(&t).unwrap_err().field(), Some(Field::Hash));

        let mut t = text();
        t.size = Some("-4".into());
        assert_eq!(text_to_raw(&t).unwrap_err().field(), Some(Field::Size));

        let mut t = text();
        t.address = Some("a|b".into());
        let err = text_to_raw(&t).unwrap_err();
        assert_eq!(err.code(), "META_MALFORMED_VALUE");
        assert_eq!(err.field(), Some(Field::Address));
    }

    #[test]
    fn test_absent_flags_default_to_zero_and_extras_ignored() {
        let mut t = text();
        t.flags = None;
        t.extras.insert("legacy.key".into(), "???".into());
        t.path = Some("ignored".into());
        assert_eq!(text_to_raw(&t).unwrap().flags, 0);
    }

    #[test]
    fn test_single_raw_to_text_requires_exactly_one_chunk() {
        let mut content = ContentRecord {
            container_id: ContainerId([7; 32]),
            path: "a/b".into(),
            size: 4096,
            chunk_count: 1,
            flags: 0,
            storage_policy: None,
            version: None,
            properties: Default::default(),
            chunks: Vec::new(),
        };
        assert_eq!(
            single_raw_to_text(&content).unwrap_err(),
            MetaError::AmbiguousChunk { found: 0 }
        );

        let raw = text_to_raw(&text()).unwrap();
        content.chunks.push(raw.clone());
        let converted = single_raw_to_text(&content).unwrap();
        assert_eq!(converted.path.as_deref(), Some("a/b"));
        assert_eq!(converted.container_id, Some("07".repeat(32)));

        content.chunks.push(raw);
        assert_eq!(
            single_raw_to_text(&content).unwrap_err(),
            MetaError::AmbiguousChunk { found: 2 }
        );
    }
}
