//! Subcommand definitions for the `waymark` binary.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Log one activity at explicit coordinates, without a session.
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Activity kind: eating or shopping
    pub kind: String,

    /// Latitude of the activity
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the activity
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Duration in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub duration: f64,

    /// Cost in currency units
    #[arg(long, allow_hyphen_values = true)]
    pub cost: f64,

    /// Number of meals (eating only)
    #[arg(long)]
    pub meals: Option<u32>,

    /// Number of items (shopping only)
    #[arg(long)]
    pub items: Option<u32>,
}

/// List the logged activities.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Remove one activity by id.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the activity to remove
    pub id: String,
}

/// Remove every activity.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Start an interactive map session on the terminal.
#[derive(Debug, Args)]
pub struct SessionCommand {}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Path to the file to validate (defaults to the standard path)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}
