//! Raw chunk record
//!
//! Binary layout of the body (see `codec` for framing):
//!
//! ```text
//! +------------------+
//! | Address          | (length-prefixed string)
//! +------------------+
//! | Volume           | (length-prefixed string)
//! +------------------+
//! | Chunk ID         | (length-prefixed string, 64 hex digits)
//! +------------------+
//! | Hash             | (16 bytes)
//! +------------------+
//! | Size             | (i64 LE)
//! +------------------+
//! | Position         | (u32 LE)
//! +------------------+
//! | Flags            | (u32 LE)
//! +------------------+
//! | Metadata Count   | (u32 LE), then key/value strings in key order
//! +------------------+
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::ChunkId;
use crate::codec::{self, BodyReader, BodyWriter};
use crate::errors::{Field, MetaError, MetaResult};

/// Length of a chunk hash, in bytes
pub const CHUNK_HASH_LEN: usize = 16;

/// Integrity footprint of one chunk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkHash(pub [u8; CHUNK_HASH_LEN]);

impl ChunkHash {
    pub fn from_hex(text: &str) -> MetaResult<Self> {
        codec::hex::decode_fixed(text, Field::Hash).map(ChunkHash)
    }

    pub fn to_hex(&self) -> String {
        codec::hex::encode_upper(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; CHUNK_HASH_LEN] {
        &self.0
    }
}

impl fmt::Debug for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkHash({})", self.to_hex())
    }
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ChunkHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChunkHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ChunkHash::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// One chunk's metadata in raw form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: ChunkId,
    pub hash: ChunkHash,
    /// Declared size in bytes. Negative values never come out of conversion or decoding.
    pub size: i64,
    pub position: u32,
    pub flags: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ChunkRecord {
    pub fn new(id: ChunkId, hash: ChunkHash, size: i64, position: u32) -> Self {
        Self {
            id,
            hash,
            size,
            position,
            flags: 0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub(crate) fn write_body(&self, w: &mut BodyWriter) {
        w.put_str(self.id.address());
        w.put_str(self.id.volume());
        w.put_str(self.id.id());
        w.put_fixed(self.hash.as_bytes());
        w.put_i64(self.size);
        w.put_u32(self.position);
        w.put_u32(self.flags);
        w.put_u32(self.metadata.len() as u32);
        for (key, value) in &self.metadata {
            w.put_str(key);
            w.put_str(value);
        }
    }

    pub(crate) fn read_body(r: &mut BodyReader<'_>) -> MetaResult<Self> {
        let id_offset = r.offset();
        let address = r.get_str("address")?;
        let volume = r.get_str("volume")?;
        let id = r.get_str("chunk id")?;
        let id = ChunkId::new(address, volume, id)
            .map_err(|e| MetaError::corrupted(id_offset, e.to_string()))?;

        let hash = ChunkHash(r.get_fixed("hash")?);

        let size_offset = r.offset();
        let size = r.get_i64("size")?;
        if size < 0 {
            return Err(MetaError::corrupted(
                size_offset,
                format!("negative chunk size {}", size),
            ));
        }
        let position = r.get_u32("position")?;
        let flags = r.get_u32("flags")?;

        let count = r.get_u32("metadata count")?;
        let mut metadata = BTreeMap::new();
        for _ in 0..count {
            let key_offset = r.offset();
            let key = r.get_str("metadata key")?;
            let value = r.get_str("metadata value")?;
            if metadata.insert(key, value).is_some() {
                return Err(MetaError::corrupted(key_offset, "duplicate metadata key"));
            }
        }

        Ok(Self {
            id,
            hash,
            size,
            position,
            flags,
            metadata,
        })
    }

    /// Serializes the record into its framed binary form.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = BodyWriter::new();
        self.write_body(&mut w);
        w.finish()
    }

    /// Decodes one framed chunk record, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> MetaResult<(Self, usize)> {
        let (mut body, consumed) = codec::unframe(data, "chunk record")?;
        let record = Self::read_body(&mut body)?;
        if !body.is_empty() {
            return Err(MetaError::corrupted(
                body.offset(),
                "trailing bytes in chunk record",
            ));
        }
        Ok((record, consumed))
    }
}
