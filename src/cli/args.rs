//! CLI argument definitions using clap
//!
//! Commands:
//! - pie-api serve [--config <path>] [--port <port>]
//! - pie-api init [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pie-api - CRUD HTTP service for pie records
#[derive(Parser, Debug)]
#[command(name = "pie-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP service
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default configuration file
    Init {
        /// Path of the configuration file to create
        #[arg(long, default_value = "./pie-api.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
