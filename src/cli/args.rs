//! CLI argument definitions using clap
//!
//! Commands:
//! - arkdb init --config <path>
//! - arkdb setup --config <path> [--collection <name>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// arkdb - A small, strict document store with collection validators and
/// secondary indexes
#[derive(Parser, Debug)]
#[command(name = "arkdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new arkdb data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./arkdb.json")]
        config: PathBuf,
    },

    /// Provision the outcomes collection (validator + indexes)
    Setup {
        /// Path to configuration file
        #[arg(long, default_value = "./arkdb.json")]
        config: PathBuf,

        /// Target collection (overrides the configured one)
        #[arg(long)]
        collection: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
