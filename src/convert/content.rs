//! Content conversion between text and raw form
//!
//! Both directions are atomic: the first failing chunk aborts the whole
//! conversion and nothing partially converted is returned.

use std::collections::BTreeMap;

use crate::chunk::ChunkTextRecord;
use crate::config::ModelConfig;
use crate::content::{check_path, ContainerId, ContentRecord, ContentTextRecord};
use crate::errors::{Field, MetaError, MetaResult};

use super::chunk;
use super::parse::{parse_flags, parse_i64, parse_size, parse_u32, required};

fn check_content_path(path: &str, config: &ModelConfig) -> MetaResult<()> {
    check_path(path, config.max_path_len).map_err(|e| match e {
        MetaError::InvalidComponent { component, reason } => MetaError::MalformedValue {
            field: component,
            reason,
        },
        other => other,
    })
}

pub(crate) fn text_to_raw(
    text: &ContentTextRecord,
    config: &ModelConfig,
) -> MetaResult<ContentRecord> {
    let container_id = required(&text.container_id, Field::ContainerId)?;
    let path = required(&text.path, Field::Path)?;
    let size = required(&text.size, Field::Size)?;
    let chunk_count = required(&text.chunk_count, Field::ChunkCount)?;

    let container_id = ContainerId::from_hex(container_id)?;
    check_content_path(path, config)?;
    let size = parse_size(size, Field::Size)?;
    let chunk_count = parse_u32(chunk_count, Field::ChunkCount)?;
    let flags = parse_flags(&text.flags)?;
    let version = text
        .version
        .as_deref()
        .map(|v| parse_i64(v, Field::Version))
        .transpose()?;

    let mut properties = BTreeMap::new();
    for property in &text.properties {
        if properties
            .insert(property.key.clone(), property.value.clone())
            .is_some()
        {
            return Err(MetaError::malformed(
                Field::Properties,
                format!("duplicate property key '{}'", property.key),
            ));
        }
    }

    let chunks = text
        .chunks
        .iter()
        .enumerate()
        .map(|(index, chunk_text)| {
            chunk::text_to_raw(chunk_text).map_err(|e| chunk_failure(index, chunk_text, e))
        })
        .collect::<MetaResult<Vec<_>>>()?;

    Ok(ContentRecord {
        container_id,
        path: path.to_string(),
        size,
        chunk_count,
        flags,
        storage_policy: text.storage_policy.clone(),
        version,
        properties,
        chunks,
    })
}

pub(crate) fn raw_to_text(
    raw: &ContentRecord,
    config: &ModelConfig,
) -> MetaResult<ContentTextRecord> {
    check_content_path(&raw.path, config)?;
    if raw.size < 0 {
        return Err(MetaError::malformed(
            Field::Size,
            format!("negative content size {}", raw.size),
        ));
    }

    let mut chunks = Vec::with_capacity(raw.chunks.len());
    for (index, chunk_raw) in raw.chunks.iter().enumerate() {
        let converted = chunk::raw_to_text(chunk_raw, raw).map_err(|e| MetaError::ChunkConversion {
            index,
            position: Some(chunk_raw.position.to_string()),
            source: Box::new(e),
        })?;
        chunks.push(converted);
    }

    Ok(ContentTextRecord {
        container_id: Some(raw.container_id.to_hex()),
        path: Some(raw.path.clone()),
        size: Some(raw.size.to_string()),
        chunk_count: Some(raw.chunk_count.to_string()),
        flags: Some(raw.flags.to_string()),
        storage_policy: raw.storage_policy.clone(),
        version: raw.version.map(|v| v.to_string()),
        chunks,
        properties: raw.property_list(),
    })
}

fn chunk_failure(index: usize, chunk_text: &ChunkTextRecord, source: MetaError) -> MetaError {
    MetaError::ChunkConversion {
        index,
        position: chunk_text.position.clone(),
        source: Box::new(source),
    }
}
