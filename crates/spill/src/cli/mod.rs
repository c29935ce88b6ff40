//! Command-line interface for spill.
//!
//! This module provides the CLI structure and argument handling for the
//! `spill` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, MonitorCommand, ServeCommand};

use crate::config::Config;

/// spill - relay clipboard content to a central collection server
///
/// Run `spill monitor` next to your clipboard and `spill serve` where the
/// broadcasts should be collected and logged.
#[derive(Debug, Parser)]
#[command(name = "spill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard and broadcast changes to the server
    Monitor(MonitorCommand),

    /// Run the collector server
    Serve(ServeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

impl MonitorCommand {
    /// Fold these flags into a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.server_url {
            config.monitor.server_url.clone_from(url);
        }
        if let Some(id) = &self.user_id {
            config.monitor.user_id.clone_from(id);
        }
        if self.poll {
            config.monitor.force_polling = true;
        }
    }
}

impl ServeCommand {
    /// Fold these flags into a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.log_dir {
            config.server.log_dir.clone_from(dir);
        }
    }
}
