//! Observable events
//!
//! Events are explicit and typed; `as_str` is the name that appears in logs.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Text chunk converted to raw
    ChunkToRaw,
    /// Raw chunk converted to text
    ChunkToText,
    /// Text content converted to raw
    ContentToRaw,
    /// Raw content converted to text
    ContentToText,
    /// Content conversion aborted by a chunk failure
    ContentConversionFailed,
    /// Declared chunk count differs from the chunk list
    ChunkCountMismatch,
    /// Chunk appended to a content under assembly
    ChunkAdded,
    /// Two chunks share the maximal position
    DuplicatePosition,
    /// Content and all its chunks and properties released
    ContentReleased,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ChunkToRaw => "CHUNK_TEXT_TO_RAW",
            Event::ChunkToText => "CHUNK_RAW_TO_TEXT",
            Event::ContentToRaw => "CONTENT_TEXT_TO_RAW",
            Event::ContentToText => "CONTENT_RAW_TO_TEXT",
            Event::ContentConversionFailed => "CONTENT_CONVERSION_FAILED",
            Event::ChunkCountMismatch => "CHUNK_COUNT_MISMATCH",
            Event::ChunkAdded => "CHUNK_ADDED",
            Event::DuplicatePosition => "DUPLICATE_POSITION",
            Event::ContentReleased => "CONTENT_RELEASED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
