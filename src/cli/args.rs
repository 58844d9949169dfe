//! CLI argument definitions using clap
//!
//! Commands:
//! - dataapi serve --config <path> [--port <port>]
//! - dataapi check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dataapi - Read-only HTTP API for historical and geographic reference data
#[derive(Parser, Debug)]
#[command(name = "dataapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect, prepare every statement, build caches and serve HTTP
    Serve {
        /// Path to configuration file (optional; defaults apply when absent)
        #[arg(long, env = "DATAAPI_CONFIG", default_value = "./dataapi.json")]
        config: PathBuf,

        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Connect and prepare every statement, then exit
    Check {
        /// Path to configuration file (optional; defaults apply when absent)
        #[arg(long, env = "DATAAPI_CONFIG", default_value = "./dataapi.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
