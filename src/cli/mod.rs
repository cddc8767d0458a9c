//! CLI module for chunkmeta
//!
//! Provides command-line access to:
//! - id: canonical chunk identifier assembly and parsing
//! - encode / decode: text and raw content conversion
//! - check: chunk sequence analysis

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, IdAction};
pub use commands::{assemble_id, check, decode, encode, parse_id, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};
