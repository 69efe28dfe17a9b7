//! Command-line interface for waymark.
//!
//! This module provides the CLI structure and command definitions for the
//! `waymark` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, ListCommand, LogCommand, RemoveCommand, SessionCommand,
};

/// waymark - Log activities at points on a map
///
/// Click a point, fill in the kind, cost, duration and quantity, and get a
/// marker plus a list entry that survive a restart.
#[derive(Debug, Parser)]
#[command(name = "waymark")]
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
    /// Start an interactive map session
    Session(SessionCommand),

    /// Log one activity at explicit coordinates
    Log(LogCommand),

    /// List logged activities
    List(ListCommand),

    /// Remove one activity by id
    Remove(RemoveCommand),

    /// Remove every activity
    Clear(ClearCommand),

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
