//! dataapi CLI entry point
//!
//! Parses arguments, runs the selected command, and exits non-zero with
//! the error on stderr if startup or serving fails.

use dataapi::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
