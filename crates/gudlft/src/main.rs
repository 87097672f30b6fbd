//! `gudlft` - CLI for the booking service
//!
//! Runs the web server, prints the points board, and drives load tests.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gudlft::cli::{Cli, Command, ConfigCommand, LoadTestCommand, PointsCommand, ServeCommand};
use gudlft::{init_logging, loadtest, web, Club, Config, Dataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(load_config(cli.config)?, serve_cmd).await,
        Command::Points(points_cmd) => handle_points(&load_config(cli.config)?, &points_cmd),
        Command::LoadTest(load_cmd) => handle_loadtest(load_cmd).await,
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = cmd.bind {
        config.server.bind = bind;
    }
    if let Some(clubs) = cmd.clubs {
        config.data.clubs_path = clubs;
    }
    if let Some(competitions) = cmd.competitions {
        config.data.competitions_path = competitions;
    }
    config.validate()?;

    web::serve(&config).await?;
    Ok(())
}

fn handle_points(config: &Config, cmd: &PointsCommand) -> anyhow::Result<()> {
    let dataset = Dataset::load(&config.data.clubs_path, &config.data.competitions_path)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(dataset.clubs())?);
    } else {
        print!("{}", points_table(dataset.clubs()));
    }
    Ok(())
}

/// Club names padded to a common width, measured in characters.
fn points_table(clubs: &[Club]) -> String {
    let width = clubs
        .iter()
        .map(|club| club.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Club".len());

    let mut table = format!("{:<width$}  Points\n{:-<width$}  ------\n", "Club", "");
    for club in clubs {
        table.push_str(&format!("{:<width$}  {:>6}\n", club.name, club.points));
    }
    table
}

async fn handle_loadtest(cmd: LoadTestCommand) -> anyhow::Result<()> {
    let report = loadtest::run(cmd.into()).await?;
    println!("{report}");
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind:                 {}", config.server.bind);
                println!();
                println!("[Data]");
                println!("  Clubs:                {}", config.data.clubs_path.display());
                println!(
                    "  Competitions:         {}",
                    config.data.competitions_path.display()
                );
                println!();
                println!("[Booking]");
                println!(
                    "  Max places per comp:  {}",
                    config.booking.max_places_per_competition
                );
                println!("  Points per place:     {}", config.booking.points_per_place);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
