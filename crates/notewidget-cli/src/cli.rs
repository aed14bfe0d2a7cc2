use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notewidget")]
#[command(about = "Keep the shared-note widget and update notifications in sync")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the sync database, instance list and rendered surfaces
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one sync pass now
    Sync {
        /// Output the pass report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run passes on the periodic interval until interrupted
    Run,
    /// Handle a push wake-up payload, e.g. '{"event":"widget_updated","id":"n1"}'
    Wake {
        /// JSON data payload from the fan-out service
        payload: String,
    },
    /// Manage widget surface instances
    Instances {
        #[command(subcommand)]
        command: InstanceCommands,
    },
    /// Show stored freshness state and the cached widget content
    State {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum InstanceCommands {
    /// List active instances
    List,
    /// Place a new instance and give it content immediately
    Add {
        /// Instance id
        id: u32,
        /// Only register the instance, skip the sync pass
        #[arg(long)]
        no_sync: bool,
    },
    /// Remove an instance and its rendered surface
    Remove {
        /// Instance id
        id: u32,
    },
}
