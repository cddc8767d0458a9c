//! Error types for chunk and content metadata
//!
//! Error codes:
//! - META_INVALID_COMPONENT (ERROR)
//! - META_BUFFER_TOO_SMALL (ERROR)
//! - META_MISSING_FIELD (ERROR)
//! - META_MALFORMED_VALUE (ERROR)
//! - META_AMBIGUOUS_CHUNK (ERROR)
//! - META_DUPLICATE_POSITION (ERROR)
//! - META_COUNT_MISMATCH (WARNING, advisory unless promoted by strict mode)
//! - META_CHUNK_CONVERSION (ERROR, wraps the failure of one chunk)
//! - META_CORRUPTED (ERROR, raw record failed to decode)

use std::fmt;

use thiserror::Error;

/// Result type for metadata operations
pub type MetaResult<T> = Result<T, MetaError>;

/// Severity of a metadata error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Advisory fact, the caller decides whether it is fatal
    Warning,
    /// Operation failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Named fields of the text and raw forms.
///
/// `as_str` returns the documented text field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Address,
    Volume,
    ChunkId,
    Hash,
    Size,
    Position,
    Flags,
    Metadata,
    ContainerId,
    Path,
    ChunkCount,
    StoragePolicy,
    Version,
    Properties,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Address => "address",
            Field::Volume => "volume",
            Field::ChunkId => "id",
            Field::Hash => "hash",
            Field::Size => "size",
            Field::Position => "position",
            Field::Flags => "flags",
            Field::Metadata => "metadata",
            Field::ContainerId => "container_id",
            Field::Path => "path",
            Field::ChunkCount => "chunk_count",
            Field::StoragePolicy => "storage_policy",
            Field::Version => "version",
            Field::Properties => "properties",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunk and content metadata errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("Invalid component {component}: {reason}")]
    InvalidComponent {
        component: Field,
        reason: String,
    },

    #[error("Buffer too small: {required} bytes required, {capacity} available")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("Missing field: {0}")]
    MissingField(Field),

    #[error("Malformed value for {field}: {reason}")]
    MalformedValue { field: Field, reason: String },

    #[error("Ambiguous chunk: expected exactly one chunk, found {found}")]
    AmbiguousChunk { found: usize },

    #[error("Duplicate position {position}: chunks {first} and {second}")]
    DuplicatePosition {
        position: u32,
        first: String,
        second: String,
    },

    #[error("Chunk count mismatch: declared {declared}, actual {actual}")]
    CountMismatch { declared: u32, actual: usize },

    #[error("Chunk #{index} (position {}) failed: {source}", .position.as_deref().unwrap_or("unset"))]
    ChunkConversion {
        index: usize,
        position: Option<String>,
        source: Box<MetaError>,
    },

    #[error("Corrupted record at byte {offset}: {reason}")]
    Corrupted { offset: usize, reason: String },
}

impl MetaError {
    pub fn invalid_component(component: Field, reason: impl Into<String>) -> Self {
        MetaError::InvalidComponent {
            component,
            reason: reason.into(),
        }
    }

    pub fn malformed(field: Field, reason: impl Into<String>) -> Self {
        MetaError::MalformedValue {
            field,
            reason: reason.into(),
        }
    }

    pub fn corrupted(offset: usize, reason: impl Into<String>) -> Self {
        MetaError::Corrupted {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            MetaError::InvalidComponent { .. } => "META_INVALID_COMPONENT",
            MetaError::BufferTooSmall { .. } => "META_BUFFER_TOO_SMALL",
            MetaError::MissingField(_) => "META_MISSING_FIELD",
            MetaError::MalformedValue { .. } => "META_MALFORMED_VALUE",
            MetaError::AmbiguousChunk { .. } => "META_AMBIGUOUS_CHUNK",
            MetaError::DuplicatePosition { .. } => "META_DUPLICATE_POSITION",
            MetaError::CountMismatch { .. } => "META_COUNT_MISMATCH",
            MetaError::ChunkConversion { .. } => "META_CHUNK_CONVERSION",
            MetaError::Corrupted { .. } => "META_CORRUPTED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MetaError::CountMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The field at fault, looking through chunk conversion wrappers
    pub fn field(&self) -> Option<Field> {
        match self {
            MetaError::InvalidComponent { component, .. } => Some(*component),
            MetaError::MissingField(field) => Some(*field),
            MetaError::MalformedValue { field, .. } => Some(*field),
            MetaError::ChunkConversion { source, .. } => source.field(),
            _ => None,
        }
    }
}
