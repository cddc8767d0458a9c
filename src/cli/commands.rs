//! CLI command implementations
//!
//! Each command is a pure function from its input text to a JSON value;
//! `run_command` handles stdin, stdout and the response envelope.

use std::path::Path;

use serde_json::{json, Value};

use crate::chunk::{assemble, ChunkId};
use crate::config::ModelConfig;
use crate::content::{ContentRecord, ContentTextRecord};
use crate::convert::Converter;
use crate::sequence::{check_sequence, last_chunk};

use super::args::{Command, IdAction};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Parse CLI args and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match dispatch(cmd) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn dispatch(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Id {
            action: IdAction::Assemble {
                address,
                volume,
                id,
            },
        } => assemble_id(&address, &volume, &id),
        Command::Id {
            action: IdAction::Parse { canonical },
        } => parse_id(&canonical),
        Command::Encode { config } => {
            let config = load_config(config.as_deref())?;
            encode(&read_input()?, &config)
        }
        Command::Decode { config } => {
            let config = load_config(config.as_deref())?;
            decode(&read_input()?, &config)
        }
        Command::Check { config } => {
            let config = load_config(config.as_deref())?;
            check(&read_input()?, &config)
        }
    }
}

/// Loads the configuration file when given, defaults otherwise, and applies
/// its log level.
fn load_config(path: Option<&Path>) -> CliResult<ModelConfig> {
    let config = match path {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };
    config.apply_logging()?;
    Ok(config)
}

pub fn assemble_id(address: &str, volume: &str, id: &str) -> CliResult<Value> {
    let canonical = assemble(address, volume, id)?;
    Ok(json!({ "canonical": canonical }))
}

pub fn parse_id(canonical: &str) -> CliResult<Value> {
    let id = ChunkId::parse(canonical)?;
    Ok(json!({
        "address": id.address(),
        "volume": id.volume(),
        "id": id.id(),
    }))
}

fn parse_text(input: &str) -> CliResult<ContentTextRecord> {
    Ok(serde_json::from_str(input)?)
}

/// Text content JSON to hex-encoded raw record.
pub fn encode(input: &str, config: &ModelConfig) -> CliResult<Value> {
    let text = parse_text(input)?;
    let converted = Converter::new(config.clone()).content_text_to_raw(&text)?;
    Ok(json!({
        "raw": hex::encode_upper(converted.record.encode()),
        "advisories": converted.advisories,
    }))
}

/// Hex-encoded raw record to text content JSON.
pub fn decode(input: &str, config: &ModelConfig) -> CliResult<Value> {
    let bytes = hex::decode(input.trim())
        .map_err(|e| CliError::invalid_input(format!("raw record is not hex: {}", e)))?;
    let (raw, consumed) = ContentRecord::decode(&bytes)?;
    if consumed != bytes.len() {
        return Err(CliError::invalid_input(format!(
            "{} trailing bytes after raw record",
            bytes.len() - consumed
        )));
    }
    let converted = Converter::new(config.clone()).content_raw_to_text(&raw)?;
    let content = serde_json::to_value(&converted.record).map_err(CliError::output)?;
    Ok(json!({
        "content": content,
        "advisories": converted.advisories,
    }))
}

/// Sequence report for a text content, plus the chunk that ends it.
pub fn check(input: &str, config: &ModelConfig) -> CliResult<Value> {
    let text = parse_text(input)?;
    let converted = Converter::new(config.clone()).content_text_to_raw(&text)?;
    let raw = converted.record;
    let last = last_chunk(&raw)?.map(|c| c.id.to_string());
    let report = serde_json::to_value(check_sequence(&raw)).map_err(CliError::output)?;
    Ok(json!({
        "report": report,
        "last_chunk": last,
        "advisories": converted.advisories,
    }))
}
