//! Canonical chunk identifier
//!
//! A chunk is addressed by the storage node holding it, the volume on that
//! node and a 64-digit hexadecimal id. The canonical string is:
//!
//! ```text
//! {address}|{volume}|{id}
//! ```
//!
//! The separator is forbidden inside every component, so the string parses
//! back to exactly the components it was built from. Components are compared
//! byte for byte; hex ids are never case-folded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Field, MetaError, MetaResult};

/// Separator joining the three components
pub const CHUNK_ID_SEPARATOR: char = '|';

/// Maximum length of the node address, in bytes
pub const MAX_ADDRESS_LEN: usize = 64;

/// Maximum length of the volume, in bytes
pub const MAX_VOLUME_LEN: usize = 64;

/// Exact number of hex digits of the chunk id
pub const CHUNK_ID_HEX_LEN: usize = 64;

/// Longest possible canonical string, without terminator
pub const MAX_CHUNK_ID_STRING_LEN: usize =
    MAX_ADDRESS_LEN + 1 + MAX_VOLUME_LEN + 1 + CHUNK_ID_HEX_LEN;

/// Identifier of one placed chunk.
///
/// Fields are private so that every instance went through validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ChunkIdParts", into = "ChunkIdParts")]
pub struct ChunkId {
    address: String,
    volume: String,
    id: String,
}

#[derive(Serialize, Deserialize)]
struct ChunkIdParts {
    address: String,
    volume: String,
    id: String,
}

impl TryFrom<ChunkIdParts> for ChunkId {
    type Error = MetaError;

    fn try_from(parts: ChunkIdParts) -> MetaResult<Self> {
        ChunkId::new(parts.address, parts.volume, parts.id)
    }
}

impl From<ChunkId> for ChunkIdParts {
    fn from(id: ChunkId) -> Self {
        ChunkIdParts {
            address: id.address,
            volume: id.volume,
            id: id.id,
        }
    }
}

fn check_component(
    value: &str,
    field: Field,
    max_len: usize,
    allow_empty: bool,
) -> MetaResult<()> {
    if value.is_empty() && !allow_empty {
        return Err(MetaError::invalid_component(field, "must not be empty"));
    }
    if value.len() > max_len {
        return Err(MetaError::invalid_component(
            field,
            format!("{} bytes exceeds maximum of {}", value.len(), max_len),
        ));
    }
    if value.contains(CHUNK_ID_SEPARATOR) {
        return Err(MetaError::invalid_component(
            field,
            format!("contains reserved separator '{}'", CHUNK_ID_SEPARATOR),
        ));
    }
    // A NUL would end the rendered string early.
    if let Some(offset) = value.bytes().position(|b| b.is_ascii_control()) {
        return Err(MetaError::invalid_component(
            field,
            format!("contains control character at byte {}", offset),
        ));
    }
    Ok(())
}

fn check_hex_id(value: &str) -> MetaResult<()> {
    if value.len() != CHUNK_ID_HEX_LEN {
        return Err(MetaError::invalid_component(
            Field::ChunkId,
            format!("expected {} hex digits, got {}", CHUNK_ID_HEX_LEN, value.len()),
        ));
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MetaError::invalid_component(
            Field::ChunkId,
            "contains non-hexadecimal characters",
        ));
    }
    Ok(())
}

impl ChunkId {
    /// Validates the three components and builds an identifier.
    pub fn new(
        address: impl Into<String>,
        volume: impl Into<String>,
        id: impl Into<String>,
    ) -> MetaResult<Self> {
        let address = address.into();
        let volume = volume.into();
        let id = id.into();

        check_component(&address, Field::Address, MAX_ADDRESS_LEN, false)?;
        check_component(&volume, Field::Volume, MAX_VOLUME_LEN, true)?;
        check_hex_id(&id)?;

        Ok(Self {
            address,
            volume,
            id,
        })
    }

    /// Parses a canonical `{address}|{volume}|{id}` string.
    pub fn parse(canonical: &str) -> MetaResult<Self> {
        let mut parts = canonical.split(CHUNK_ID_SEPARATOR);
        let (Some(address), Some(volume), Some(id), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MetaError::invalid_component(
                Field::ChunkId,
                format!(
                    "canonical id must have exactly 3 components separated by '{}'",
                    CHUNK_ID_SEPARATOR
                ),
            ));
        };
        Self::new(address, volume, id)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn volume(&self) -> &str {
        &self.volume
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Length of the canonical string, without terminator
    pub fn canonical_len(&self) -> usize {
        self.address.len() + self.volume.len() + self.id.len() + 2
    }

    /// Renders the canonical string into `dst`, followed by a `0` terminator.
    ///
    /// Returns the number of bytes written, terminator excluded. When `dst`
    /// cannot hold the whole string plus terminator nothing is written.
    pub fn render(&self, dst: &mut [u8]) -> MetaResult<usize> {
        let len = self.canonical_len();
        if dst.len() < len + 1 {
            return Err(MetaError::BufferTooSmall {
                required: len + 1,
                capacity: dst.len(),
            });
        }

        let mut pos = 0;
        for (i, part) in [&self.address, &self.volume, &self.id].into_iter().enumerate() {
            if i > 0 {
                dst[pos] = CHUNK_ID_SEPARATOR as u8;
                pos += 1;
            }
            dst[pos..pos + part.len()].copy_from_slice(part.as_bytes());
            pos += part.len();
        }
        dst[pos] = 0;
        Ok(pos)
    }
}

/// Joins the three components into the canonical string.
pub fn assemble(address: &str, volume: &str, id: &str) -> MetaResult<String> {
    ChunkId::new(address, volume, id).map(|chunk_id| chunk_id.to_string())
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.address,
            self.volume,
            self.id,
            sep = CHUNK_ID_SEPARATOR
        )
    }
}

impl FromStr for ChunkId {
    type Err = MetaError;

    fn from_str(s: &str) -> MetaResult<Self> {
        Self::parse(s)
    }
}
