//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::loadtest::LoadTestConfig;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Path to clubs.json (overrides `data.clubs_path`)
    #[arg(long, value_name = "FILE")]
    pub clubs: Option<PathBuf>,

    /// Path to competitions.json (overrides `data.competitions_path`)
    #[arg(long, value_name = "FILE")]
    pub competitions: Option<PathBuf>,
}

/// Points command arguments.
#[derive(Debug, Args)]
pub struct PointsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Load-test command arguments.
#[derive(Debug, Args)]
pub struct LoadTestCommand {
    /// Base URL of the server under test
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub host: String,

    /// Number of concurrent virtual users
    #[arg(short, long, default_value = "10")]
    pub users: usize,

    /// Test duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Shortest think time between tasks, in milliseconds
    #[arg(long, default_value = "1000")]
    pub min_wait_ms: u64,

    /// Longest think time between tasks, in milliseconds
    #[arg(long, default_value = "5000")]
    pub max_wait_ms: u64,

    /// Email used by the login task
    #[arg(long, default_value = "admin@irontemple.com")]
    pub club_email: String,

    /// Club used by the booking flow
    #[arg(long, default_value = "Iron Temple")]
    pub club: String,

    /// Competition used by the booking flow
    #[arg(long, default_value = "Fall Classic")]
    pub competition: String,
}

impl From<LoadTestCommand> for LoadTestConfig {
    fn from(cmd: LoadTestCommand) -> Self {
        Self {
            host: cmd.host.trim_end_matches('/').to_string(),
            users: cmd.users,
            duration: Duration::from_secs(cmd.duration),
            min_wait: Duration::from_millis(cmd.min_wait_ms),
            max_wait: Duration::from_millis(cmd.max_wait_ms),
            club_email: cmd.club_email,
            club: cmd.club,
            competition: cmd.competition,
        }
    }
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

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Configuration file to validate (defaults to the standard path)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}
