//! CLI argument definitions using clap
//!
//! Commands:
//! - chunkmeta id assemble --address <A> --volume <V> --id <HEX>
//! - chunkmeta id parse <CANONICAL>
//! - chunkmeta encode [--config <path>]   (text content JSON on stdin)
//! - chunkmeta decode [--config <path>]   (hex raw content on stdin)
//! - chunkmeta check [--config <path>]    (text content JSON on stdin)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chunkmeta - chunk and content metadata tool
#[derive(Parser, Debug)]
#[command(name = "chunkmeta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build or split canonical chunk identifiers
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Convert a text content record to its raw binary form
    Encode {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert a raw binary content record to its text form
    Decode {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze the chunk sequence of a text content record
    Check {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum IdAction {
    /// Join address, volume and hex id
    Assemble {
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        volume: String,
        #[arg(long)]
        id: String,
    },

    /// Split a canonical identifier
    Parse { canonical: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
