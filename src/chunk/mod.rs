//! Chunk-level metadata
//!
//! A chunk is one fixed-position fragment of a content, placed on a storage
//! node. It exists in two forms:
//!
//! - `ChunkRecord`: raw, typed, with a framed binary encoding
//! - `ChunkTextRecord`: textual key/value form, tolerant of partial data
//!
//! Both are addressed by a `ChunkId`.

mod id;
mod record;
mod text;

pub use id::{
    assemble, ChunkId, CHUNK_ID_HEX_LEN, CHUNK_ID_SEPARATOR, MAX_ADDRESS_LEN,
    MAX_CHUNK_ID_STRING_LEN, MAX_VOLUME_LEN,
};
pub use record::{ChunkHash, ChunkRecord, CHUNK_HASH_LEN};
pub use text::{
    ChunkTextRecord, ATTR_ADDRESS, ATTR_CONTAINER, ATTR_FLAGS, ATTR_HASH, ATTR_ID,
    ATTR_META_PREFIX, ATTR_PATH, ATTR_POSITION, ATTR_SIZE, ATTR_VOLUME,
};
