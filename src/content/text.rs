//! Textual content record
//!
//! Content-level attribute keys:
//!
//! | key                   | field          |
//! |-----------------------|----------------|
//! | `content.container`   | container_id   |
//! | `content.path`        | path           |
//! | `content.size`        | size           |
//! | `content.chunk_count` | chunk_count    |
//! | `content.flags`       | flags          |
//! | `content.policy`      | storage_policy |
//! | `content.version`     | version        |
//! | `content.prop.<key>`  | property       |
//!
//! Chunks are not part of the flat form; each chunk has its own attribute set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::Property;
use crate::chunk::{ChunkTextRecord, ATTR_CONTAINER, ATTR_PATH};

pub const ATTR_CONTENT_SIZE: &str = "content.size";
pub const ATTR_CONTENT_CHUNK_COUNT: &str = "content.chunk_count";
pub const ATTR_CONTENT_FLAGS: &str = "content.flags";
pub const ATTR_CONTENT_POLICY: &str = "content.policy";
pub const ATTR_CONTENT_VERSION: &str = "content.version";
pub const ATTR_PROPERTY_PREFIX: &str = "content.prop.";

/// A content's metadata in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTextRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub chunks: Vec<ChunkTextRecord>,
    pub properties: Vec<Property>,
}

impl ContentTextRecord {
    /// Content-level fields and properties as attribute pairs.
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        let fields = [
            (ATTR_CONTAINER, &self.container_id),
            (ATTR_PATH, &self.path),
            (ATTR_CONTENT_SIZE, &self.size),
            (ATTR_CONTENT_CHUNK_COUNT, &self.chunk_count),
            (ATTR_CONTENT_FLAGS, &self.flags),
            (ATTR_CONTENT_POLICY, &self.storage_policy),
            (ATTR_CONTENT_VERSION, &self.version),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                attrs.insert(key.to_string(), value.clone());
            }
        }
        for property in &self.properties {
            attrs.insert(
                format!("{}{}", ATTR_PROPERTY_PREFIX, property.key),
                property.value.clone(),
            );
        }
        attrs
    }

    /// Reads content-level fields from attribute pairs, ignoring other keys.
    pub fn from_attributes<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (key, value) in attrs {
            let key = key.as_ref();
            let slot = match key {
                ATTR_CONTAINER => &mut record.container_id,
                ATTR_PATH => &mut record.path,
                ATTR_CONTENT_SIZE => &mut record.size,
                ATTR_CONTENT_CHUNK_COUNT => &mut record.chunk_count,
                ATTR_CONTENT_FLAGS => &mut record.flags,
                ATTR_CONTENT_POLICY => &mut record.storage_policy,
                ATTR_CONTENT_VERSION => &mut record.version,
                _ => {
                    if let Some(prop) = key.strip_prefix(ATTR_PROPERTY_PREFIX) {
                        record.properties.push(Property::new(prop, value));
                    }
                    continue;
                }
            };
            *slot = Some(value.into());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_roundtrip() {
        let record = ContentTextRecord {
            container_id: Some("AB".repeat(32)),
            path: Some("a/b".into()),
            size: Some("10".into()),
            chunk_count: Some("1".into()),
            flags: Some("0".into()),
            storage_policy: None,
            version: Some("3".into()),
            chunks: Vec::new(),
            properties: vec![Property::new("color", "blue")],
        };
        let attrs = record.to_attributes();
        assert_eq!(attrs["content.prop.color"], "blue");
        assert!(!attrs.contains_key(ATTR_CONTENT_POLICY));
        assert_eq!(ContentTextRecord::from_attributes(&attrs), record);
    }

    #[test]
    fn test_chunk_keys_ignored() {
        let record =
            ContentTextRecord::from_attributes([("chunk.size", "5"), ("content.size", "9")]);
        assert_eq!(record.size.as_deref(), Some("9"));
        assert!(record.properties.is_empty());
    }

    #[test]
    fn test_json_roundtrip_with_chunks() {
        let record = ContentTextRecord {
            path: Some("x".into()),
            chunks: vec![ChunkTextRecord {
                position: Some("0".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ContentTextRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
