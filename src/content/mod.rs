//! Content-level metadata
//!
//! A content is a stored object, addressed by container and path and split
//! into chunks. Like chunks it exists in a raw form (`ContentRecord`) and a
//! text form (`ContentTextRecord`). `lifecycle` governs how raw contents are
//! created, assembled and released.

pub mod lifecycle;
mod record;
mod text;

pub use lifecycle::{
    add_chunk, create_chunk, create_content, destroy_content, set_property, Released,
};
pub(crate) use record::check_path;
pub use record::{ContainerId, ContentRecord, Property, CONTAINER_ID_LEN, MAX_PATH_LEN};
pub use text::{
    ContentTextRecord, ATTR_CONTENT_CHUNK_COUNT, ATTR_CONTENT_FLAGS, ATTR_CONTENT_POLICY,
    ATTR_CONTENT_SIZE, ATTR_CONTENT_VERSION, ATTR_PROPERTY_PREFIX,
};
