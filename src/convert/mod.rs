//! Conversion between the text and raw forms
//!
//! All conversions are pure: inputs are borrowed, a new record is returned.
//!
//! # Field encoding
//!
//! - Hash and container id: hex, emitted uppercase, accepted in either case
//! - Numbers: canonical decimal, no sign, no leading zero
//! - Chunk id components: copied verbatim, never case-folded
//!
//! # Declared chunk count
//!
//! `chunk_count` is carried as declared. When it disagrees with the number of
//! chunks, content conversions attach `Advisory::CountMismatch` to the result
//! (or fail with `MetaError::CountMismatch` under `strict_chunk_count`).

mod chunk;
mod content;
mod parse;

use serde::Serialize;

use crate::chunk::{ChunkRecord, ChunkTextRecord};
use crate::config::ModelConfig;
use crate::content::{ContentRecord, ContentTextRecord};
use crate::errors::{MetaError, MetaResult};
use crate::observability::{log_event, Event, Severity};

/// Non-fatal fact noticed during a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    CountMismatch { declared: u32, actual: usize },
}

impl Advisory {
    /// The advisory as an error, for callers that treat it as fatal
    pub fn to_error(&self) -> MetaError {
        match self {
            Advisory::CountMismatch { declared, actual } => MetaError::CountMismatch {
                declared: *declared,
                actual: *actual,
            },
        }
    }
}

/// A converted record and the advisories raised while converting it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted<T> {
    pub record: T,
    pub advisories: Vec<Advisory>,
}

impl<T> Converted<T> {
    pub fn into_record(self) -> T {
        self.record
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Conversion engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ModelConfig,
}

impl Converter {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn chunk_text_to_raw(&self, text: &ChunkTextRecord) -> MetaResult<ChunkRecord> {
        let raw = chunk::text_to_raw(text)?;
        log_event(
            Severity::Trace,
            Event::ChunkToRaw,
            &[("chunk", &raw.id.to_string())],
        );
        Ok(raw)
    }

    /// Reads a chunk from extended attributes carrying the configured
    /// namespace prefix.
    pub fn chunk_from_attributes<I, K, V>(&self, attrs: I) -> MetaResult<ChunkRecord>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let text =
            ChunkTextRecord::from_attributes_with_prefix(attrs, &self.config.attribute_prefix);
        self.chunk_text_to_raw(&text)
    }

    /// Converts the only chunk of `content`, filling content-scoped fields
    /// from it. Fails with `AmbiguousChunk` unless exactly one chunk is held.
    pub fn chunk_raw_to_text(&self, content: &ContentRecord) -> MetaResult<ChunkTextRecord> {
        let text = chunk::single_raw_to_text(content)?;
        log_event(
            Severity::Trace,
            Event::ChunkToText,
            &[("path", &content.path)],
        );
        Ok(text)
    }

    pub fn content_text_to_raw(
        &self,
        text: &ContentTextRecord,
    ) -> MetaResult<Converted<ContentRecord>> {
        let raw = content::text_to_raw(text, &self.config).map_err(|e| {
            report_failure(Event::ContentToRaw, text.path.as_deref().unwrap_or(""), &e);
            e
        })?;
        let advisories = self.count_advisories(&raw)?;
        log_event(
            Severity::Trace,
            Event::ContentToRaw,
            &[("chunks", &raw.chunks.len().to_string()), ("path", &raw.path)],
        );
        Ok(Converted {
            record: raw,
            advisories,
        })
    }

    pub fn content_raw_to_text(
        &self,
        raw: &ContentRecord,
    ) -> MetaResult<Converted<ContentTextRecord>> {
        let text = content::raw_to_text(raw, &self.config).map_err(|e| {
            report_failure(Event::ContentToText, &raw.path, &e);
            e
        })?;
        let advisories = self.count_advisories(raw)?;
        log_event(
            Severity::Trace,
            Event::ContentToText,
            &[("chunks", &raw.chunks.len().to_string()), ("path", &raw.path)],
        );
        Ok(Converted {
            record: text,
            advisories,
        })
    }

    fn count_advisories(&self, raw: &ContentRecord) -> MetaResult<Vec<Advisory>> {
        let Some((declared, actual)) = raw.count_mismatch() else {
            return Ok(Vec::new());
        };
        let advisory = Advisory::CountMismatch { declared, actual };
        if self.config.strict_chunk_count {
            return Err(advisory.to_error());
        }
        log_event(
            Severity::Warn,
            Event::ChunkCountMismatch,
            &[
                ("actual", &actual.to_string()),
                ("declared", &declared.to_string()),
                ("path", &raw.path),
            ],
        );
        Ok(vec![advisory])
    }
}

fn report_failure(direction: Event, path: &str, err: &MetaError) {
    log_event(
        Severity::Info,
        Event::ContentConversionFailed,
        &[
            ("code", err.code()),
            ("direction", direction.as_str()),
            ("path", path),
            ("reason", &err.to_string()),
        ],
    );
}

/// Converts a text chunk with the default configuration.
pub fn chunk_text_to_raw(text: &ChunkTextRecord) -> MetaResult<ChunkRecord> {
    Converter::default().chunk_text_to_raw(text)
}

/// Converts the single chunk of `content` with the default configuration.
pub fn chunk_raw_to_text(content: &ContentRecord) -> MetaResult<ChunkTextRecord> {
    Converter::default().chunk_raw_to_text(content)
}

/// Converts a text content with the default configuration.
pub fn content_text_to_raw(text: &ContentTextRecord) -> MetaResult<Converted<ContentRecord>> {
    Converter::default().content_text_to_raw(text)
}

/// Converts a raw content with the default configuration.
pub fn content_raw_to_text(raw: &ContentRecord) -> MetaResult<Converted<ContentTextRecord>> {
    Converter::default().content_raw_to_text(raw)
}
