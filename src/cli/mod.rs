//! CLI module for dataapi
//!
//! Provides command-line interface for:
//! - serve: Prepare statements, build caches and serve HTTP
//! - check: Verify the database accepts every statement

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
