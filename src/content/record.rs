//! Raw content record
//!
//! Binary layout of the body (see `codec` for framing):
//!
//! ```text
//! +------------------+
//! | Container ID     | (32 bytes)
//! +------------------+
//! | Path             | (length-prefixed string)
//! +------------------+
//! | Size             | (i64 LE)
//! +------------------+
//! | Chunk Count      | (u32 LE, declared)
//! +------------------+
//! | Flags            | (u32 LE)
//! +------------------+
//! | Storage Policy   | (u8 tag, then string if tag = 1)
//! +------------------+
//! | Version          | (u8 tag, then i64 LE if tag = 1)
//! +------------------+
//! | Properties       | (u32 count, then key/value strings in key order)
//! +------------------+
//! | Chunks           | (u32 count, then one framed chunk record each)
//! +------------------+
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkRecord;
use crate::codec::{self, BodyReader, BodyWriter};
use crate::errors::{Field, MetaError, MetaResult};

/// Length of a container id, in bytes
pub const CONTAINER_ID_LEN: usize = 32;

/// Maximum length of a content path, in bytes
pub const MAX_PATH_LEN: usize = 1023;

/// Identifier of the container a content belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContainerId(pub [u8; CONTAINER_ID_LEN]);

impl ContainerId {
    pub fn from_hex(text: &str) -> MetaResult<Self> {
        codec::hex::decode_fixed(text, Field::ContainerId).map(ContainerId)
    }

    pub fn to_hex(&self) -> String {
        codec::hex::encode_upper(&self.0)
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.to_hex())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContainerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ContainerId::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// A key/value property attached to a content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Checks a content path against the hard bound.
pub(crate) fn check_path(path: &str, max_len: usize) -> MetaResult<()> {
    if path.is_empty() {
        return Err(MetaError::invalid_component(Field::Path, "must not be empty"));
    }
    let bound = max_len.min(MAX_PATH_LEN);
    if path.len() > bound {
        return Err(MetaError::invalid_component(
            Field::Path,
            format!("{} bytes exceeds maximum of {}", path.len(), bound),
        ));
    }
    Ok(())
}

/// A content's metadata in raw form.
///
/// The content exclusively owns its chunks and properties. Chunks are kept
/// in insertion order; their `position` field, not the order, defines the
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub container_id: ContainerId,
    pub path: String,
    /// Declared total size in bytes. A negative value means unknown.
    pub size: i64,
    /// Declared number of chunks; never rewritten from `chunks.len()`.
    pub chunk_count: u32,
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

impl ContentRecord {
    /// Properties as `Property` values, in key order
    pub fn property_list(&self) -> Vec<Property> {
        self.properties
            .iter()
            .map(|(key, value)| Property::new(key.clone(), value.clone()))
            .collect()
    }

    /// True when the declared chunk count disagrees with the owned chunks
    pub fn count_mismatch(&self) -> Option<(u32, usize)> {
        if self.chunk_count as usize != self.chunks.len() {
            Some((self.chunk_count, self.chunks.len()))
        } else {
            None
        }
    }

    /// Serializes the content, chunks included, into its framed binary form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = BodyWriter::new();
        w.put_fixed(&self.container_id.0);
        w.put_str(&self.path);
        w.put_i64(self.size);
        w.put_u32(self.chunk_count);
        w.put_u32(self.flags);

        match &self.storage_policy {
            Some(policy) => {
                w.put_u8(1);
                w.put_str(policy);
            }
            None => w.put_u8(0),
        }
        match self.version {
            Some(version) => {
                w.put_u8(1);
                w.put_i64(version);
            }
            None => w.put_u8(0),
        }

        w.put_u32(self.properties.len() as u32);
        for (key, value) in &self.properties {
            w.put_str(key);
            w.put_str(value);
        }

        w.put_u32(self.chunks.len() as u32);
        for chunk in &self.chunks {
            w.put_fixed(&chunk.encode());
        }
        w.finish()
    }

    /// Decodes one framed content record, verifying every checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> MetaResult<(Self, usize)> {
        let (mut r, consumed) = codec::unframe(data, "content record")?;

        let container_id = ContainerId(r.get_fixed("container id")?);

        let path_offset = r.offset();
        let path = r.get_str("path")?;
        check_path(&path, MAX_PATH_LEN)
            .map_err(|e| MetaError::corrupted(path_offset, e.to_string()))?;

        let size_offset = r.offset();
        let size = r.get_i64("size")?;
        if size < 0 {
            return Err(MetaError::corrupted(
                size_offset,
                format!("negative content size {}", size),
            ));
        }
        let chunk_count = r.get_u32("chunk count")?;
        let flags = r.get_u32("flags")?;

        let storage_policy = match read_tag(&mut r, "storage policy tag")? {
            true => Some(r.get_str("storage policy")?),
            false => None,
        };
        let version = match read_tag(&mut r, "version tag")? {
            true => Some(r.get_i64("version")?),
            false => None,
        };

        let property_count = r.get_u32("property count")?;
        let mut properties = BTreeMap::new();
        for _ in 0..property_count {
            let key_offset = r.offset();
            let key = r.get_str("property key")?;
            let value = r.get_str("property value")?;
            if properties.insert(key, value).is_some() {
                return Err(MetaError::corrupted(key_offset, "duplicate property key"));
            }
        }

        let chunk_total = r.get_u32("chunk list count")?;
        let mut chunks = Vec::new();
        for _ in 0..chunk_total {
            let mut chunk_body = r.get_record("chunk record")?;
            let chunk = ChunkRecord::read_body(&mut chunk_body)?;
            if !chunk_body.is_empty() {
                return Err(MetaError::corrupted(
                    chunk_body.offset(),
                    "trailing bytes in chunk record",
                ));
            }
            chunks.push(chunk);
        }

        if !r.is_empty() {
            return Err(MetaError::corrupted(
                r.offset(),
                "trailing bytes in content record",
            ));
        }

        Ok((
            Self {
                container_id,
                path,
                size,
                chunk_count,
                flags,
                storage_policy,
                version,
                properties,
                chunks,
            },
            consumed,
        ))
    }
}

fn read_tag(r: &mut BodyReader<'_>, what: &str) -> MetaResult<bool> {
    let offset = r.offset();
    match r.get_u8(what)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(MetaError::corrupted(
            offset,
            format!("invalid {}: {}", what, other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkHash, ChunkId};

    fn chunk(position: u32, size: i64) -> ChunkRecord {
        let hex = format!("{:064X}", position + 1);
        ChunkRecord::new(
            ChunkId::new("10.0.0.1:6000", "/vol", hex).unwrap(),
            ChunkHash([position as u8; 16]),
            size,
            position,
        )
    }

    fn sample() -> ContentRecord {
        ContentRecord {
            container_id: ContainerId([0x11; CONTAINER_ID_LEN]),
            path: "photos/2024/cat.jpg".to_string(),
            size: 300,
            chunk_count: 2,
            flags: 0,
            storage_policy: Some("THREECOPIES".to_string()),
            version: Some(1_700_000_000),
            properties: BTreeMap::from([("owner".to_string(), "alice".to_string())]),
            chunks: vec![chunk(1, 100), chunk(0, 200)],
        }
    }

    #[test]
    fn test_content_roundtrip() {
        let content = sample();
        let encoded = content.encode();
        let (decoded, consumed) = ContentRecord::decode(&encoded).unwrap();
        assert_eq!(decoded, content);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_optional_fields_absent() {
        let mut content = sample();
        content.storage_policy = None;
        content.version = None;
        content.chunks.clear();
        let (decoded, _) = ContentRecord::decode(&content.encode()).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_nested_chunk_corruption_detected() {
        let content = sample();
        let mut encoded = content.encode();
        // Last chunk record sits right before the outer checksum.
        let inner = encoded.len() - 12;
        encoded[inner] ^= 0x01;
        assert!(ContentRecord::decode(&encoded).is_err());
    }

    #[test]
    fn test_trailing_garbage_after_frame_is_not_consumed() {
        let content = sample();
        let mut encoded = content.encode();
        let len = encoded.len();
        encoded.extend_from_slice(b"next");
        let (_, consumed) = ContentRecord::decode(&encoded).unwrap();
        assert_eq!(consumed, len);
    }

    #[test]
    fn test_count_mismatch() {
        let mut content = sample();
        assert_eq!(content.count_mismatch(), None);
        content.chunk_count = 5;
        assert_eq!(content.count_mismatch(), Some((5, 2)));
    }

    #[test]
    fn test_path_bounds() {
        assert!(check_path("a", MAX_PATH_LEN).is_ok());
        assert!(check_path("", MAX_PATH_LEN).is_err());
        assert!(check_path(&"p".repeat(MAX_PATH_LEN + 1), usize::MAX).is_err());
        assert!(check_path("abcd", 3).is_err());
    }

    #[test]
    fn test_container_id_hex() {
        let hex = "ab".repeat(CONTAINER_ID_LEN);
        let cid = ContainerId::from_hex(&hex).unwrap();
        assert_eq!(cid.to_hex(), hex.to_uppercase());
    }
}
