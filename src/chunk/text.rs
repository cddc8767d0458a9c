//! Textual chunk record
//!
//! Every field is an optional string so that legacy or partial data can be
//! carried without loss. Parsing happens only in `convert`.
//!
//! Attribute keys of the flat key/value form:
//!
//! | key                 | field          |
//! |---------------------|----------------|
//! | `chunk.address`     | address        |
//! | `chunk.volume`      | volume         |
//! | `chunk.id`          | id             |
//! | `chunk.hash`        | hash           |
//! | `chunk.size`        | size           |
//! | `chunk.position`    | position       |
//! | `chunk.flags`       | flags          |
//! | `content.container` | container_id   |
//! | `content.path`      | path           |
//! | `chunk.meta.<key>`  | metadata entry |
//!
//! Any other key is kept in `extras`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const ATTR_ADDRESS: &str = "chunk.address";
pub const ATTR_VOLUME: &str = "chunk.volume";
pub const ATTR_ID: &str = "chunk.id";
pub const ATTR_HASH: &str = "chunk.hash";
pub const ATTR_SIZE: &str = "chunk.size";
pub const ATTR_POSITION: &str = "chunk.position";
pub const ATTR_FLAGS: &str = "chunk.flags";
pub const ATTR_CONTAINER: &str = "content.container";
pub const ATTR_PATH: &str = "content.path";
pub const ATTR_META_PREFIX: &str = "chunk.meta.";

/// One chunk's metadata in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkTextRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    /// Content context, filled when converting from raw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Content context, filled when converting from raw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Unparsed legacy pairs
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl ChunkTextRecord {
    /// Flattens the record into attribute key/value pairs.
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = self.extras.clone();
        let fields = [
            (ATTR_ADDRESS, &self.address),
            (ATTR_VOLUME, &self.volume),
            (ATTR_ID, &self.id),
            (ATTR_HASH, &self.hash),
            (ATTR_SIZE, &self.size),
            (ATTR_POSITION, &self.position),
            (ATTR_FLAGS, &self.flags),
            (ATTR_CONTAINER, &self.container_id),
            (ATTR_PATH, &self.path),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                attrs.insert(key.to_string(), value.clone());
            }
        }
        for (key, value) in &self.metadata {
            attrs.insert(format!("{}{}", ATTR_META_PREFIX, key), value.clone());
        }
        attrs
    }

    /// Builds a record from attribute pairs; unknown keys land in `extras`.
    pub fn from_attributes<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (key, value) in attrs {
            let key = key.into();
            let value = value.into();
            let slot = match key.as_str() {
                ATTR_ADDRESS => &mut record.address,
                ATTR_VOLUME => &mut record.volume,
                ATTR_ID => &mut record.id,
                ATTR_HASH => &mut record.hash,
                ATTR_SIZE => &mut record.size,
                ATTR_POSITION => &mut record.position,
                ATTR_FLAGS => &mut record.flags,
                ATTR_CONTAINER => &mut record.container_id,
                ATTR_PATH => &mut record.path,
                other => {
                    match other.strip_prefix(ATTR_META_PREFIX) {
                        Some(meta_key) if !meta_key.is_empty() => {
                            record.metadata.insert(meta_key.to_string(), value);
                        }
                        _ => {
                            record.extras.insert(key, value);
                        }
                    }
                    continue;
                }
            };
            *slot = Some(value);
        }
        record
    }

    /// Like `from_attributes`, keeping only keys under `prefix` (e.g. `user.`)
    /// and stripping it.
    pub fn from_attributes_with_prefix<I, K, V>(attrs: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::from_attributes(attrs.into_iter().filter_map(|(key, value)| {
            key.as_ref()
                .strip_prefix(prefix)
                .map(|stripped| (stripped.to_string(), value.into()))
        }))
    }
}
