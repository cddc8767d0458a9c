//! Configuration Tests
//!
//! Tests for:
//! - configuration files are loaded and validated
//! - strict chunk count turns the count advisory into an error
//! - the configured path bound applies to conversions

use std::fs;

use chunkmeta::cli;
use chunkmeta::config::ModelConfig;
use chunkmeta::content::{ContentTextRecord, Property};
use chunkmeta::convert::Converter;
use chunkmeta::errors::{Field, MetaError};
use tempfile::TempDir;

fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("chunkmeta.json");
    fs::write(&path, json).unwrap();
    path
}

fn text(chunk_count: &str) -> ContentTextRecord {
    ContentTextRecord {
        container_id: Some("0F".repeat(32)),
        path: Some("archive/2023.tar".into()),
        size: Some("0".into()),
        chunk_count: Some(chunk_count.into()),
        properties: vec![Property::new("k", "v")],
        ..Default::default()
    }
}

#[test]
fn test_strict_file_rejects_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"strict_chunk_count": true}"#);

    let config = ModelConfig::load(&path).unwrap();
    assert!(config.strict_chunk_count);
    assert_eq!(config.max_path_len, 1023);

    let err = Converter::new(config.clone())
        .content_text_to_raw(&text("2"))
        .unwrap_err();
    assert_eq!(
        err,
        MetaError::CountMismatch {
            declared: 2,
            actual: 0
        }
    );

    let input = serde_json::to_string(&text("2")).unwrap();
    let cli_err = cli::encode(&input, &config).unwrap_err();
    assert_eq!(cli_err.code_str(), "META_COUNT_MISMATCH");
}

#[test]
fn test_path_bound_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"max_path_len": 8}"#);
    let config = ModelConfig::load(&path).unwrap();

    let err = Converter::new(config)
        .content_text_to_raw(&text("0"))
        .unwrap_err();
    assert_eq!(err.field(), Some(Field::Path));
}

#[test]
fn test_invalid_files_are_rejected() {
    let dir = TempDir::new().unwrap();
    for json in [
        r#"{"max_path_len": 0}"#,
        r#"{"max_path_len": 4096}"#,
        r#"{"log_level": "loud"}"#,
        "not json",
    ] {
        let path = write_config(&dir, json);
        assert!(ModelConfig::load(&path).is_err(), "accepted {}", json);
    }
    assert!(ModelConfig::load(&dir.path().join("missing.json")).is_err());
}
