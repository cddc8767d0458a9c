//! chunkmeta CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors are already
//! reported on stdout as a JSON envelope; they are repeated on stderr and
//! the process exits non-zero.

use chunkmeta::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
