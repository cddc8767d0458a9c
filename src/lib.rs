//! chunkmeta - metadata model for chunked content in an object store
//!
//! A content (an object's data) is split into chunks, each stored on a
//! storage service and identified by a canonical `address|volume|hexid`
//! string. Records exist in two forms:
//! - text: string fields, as exchanged with clients and attribute stores
//! - raw: typed fields with a checksummed binary layout
//!
//! This crate assembles and parses chunk identifiers, converts records
//! between both forms, answers sequence questions (is this chunk the last
//! one?) and manages the lifecycle of in-memory records.

pub mod chunk;
pub mod cli;
pub mod codec;
pub mod config;
pub mod content;
pub mod convert;
pub mod errors;
pub mod observability;
pub mod sequence;

pub use chunk::{assemble, ChunkHash, ChunkId, ChunkRecord, ChunkTextRecord};
pub use config::{ConfigError, ModelConfig};
pub use content::{ContainerId, ContentRecord, ContentTextRecord, Property};
pub use convert::{
    chunk_raw_to_text, chunk_text_to_raw, content_raw_to_text, content_text_to_raw, Advisory,
    Converted, Converter,
};
pub use errors::{Field, MetaError, MetaResult};
pub use sequence::is_last_chunk;
