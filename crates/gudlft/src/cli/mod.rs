//! Command-line interface for gudlft.
//!
//! This module provides the CLI structure for the `gudlft` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, LoadTestCommand, PointsCommand, ServeCommand};

/// gudlft - Book competition places with club points
///
/// Serves the booking site, prints the points board, and drives load tests
/// against a running instance.
#[derive(Debug, Parser)]
#[command(name = "gudlft")]
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
    /// Run the booking web server
    Serve(ServeCommand),

    /// Print every club's points balance
    Points(PointsCommand),

    /// Drive simulated users against a running server
    #[command(name = "loadtest")]
    LoadTest(LoadTestCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
