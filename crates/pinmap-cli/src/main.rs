//! Pinmap CLI - drop geotagged notes on a map from the terminal
//!
//! Drives the same client state controllers as the graphical front ends.

mod cli;
mod commands;
mod error;
mod session_store;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::resolve_config_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::folders::run_folders;
use crate::commands::friends::run_friends;
use crate::commands::pins::run_pins;
use crate::commands::places::run_places;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "pinmap=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Pins { command } => run_pins(command, &config_path).await?,
        Commands::Folders { command } => run_folders(command, &config_path).await?,
        Commands::Friends { command } => run_friends(command, &config_path).await?,
        Commands::Places { command } => run_places(command, &config_path).await?,
        Commands::Auth { command } => run_auth(command, &config_path).await?,
        Commands::Config { command } => run_config(command, &config_path)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
