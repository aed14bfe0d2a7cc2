//! notewidget - command-line host for the widget sync worker
//!
//! Stands in for the platform: surfaces are JSON files, notifications go to
//! stdout and a journal, and `run` plays the periodic trigger.

mod cli;
mod commands;
mod error;
mod host;

use clap::Parser;

use crate::cli::{Cli, Commands, InstanceCommands};
use crate::commands::common::resolve_data_dir;
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
    if let Ok(directive) = "notewidget=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Commands::Sync { json } => commands::sync::run_sync(&data_dir, json).await?,
        Commands::Run => commands::run::run_periodic(&data_dir).await?,
        Commands::Wake { payload } => commands::wake::run_wake(&payload, &data_dir).await?,
        Commands::Instances { command } => match command {
            InstanceCommands::List => commands::instances::run_list(&data_dir)?,
            InstanceCommands::Add { id, no_sync } => {
                commands::instances::run_add(id, no_sync, &data_dir).await?;
            }
            InstanceCommands::Remove { id } => commands::instances::run_remove(id, &data_dir)?,
        },
        Commands::State { json } => commands::state::run_state(&data_dir, json).await?,
    }

    Ok(())
}
