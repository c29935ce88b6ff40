//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Monitor command arguments.
#[derive(Debug, Args)]
pub struct MonitorCommand {
    /// Base URL of the collector server
    #[arg(short, long, value_name = "URL")]
    pub server_url: Option<String>,

    /// User id to tag broadcasts with
    #[arg(short, long, value_name = "ID")]
    pub user_id: Option<String>,

    /// Skip the native listener probe and poll the clipboard
    #[arg(long)]
    pub poll: bool,
}

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory for the log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the default configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the standard location)
        file: Option<PathBuf>,
    },
}
