//! Command-line interface for schoolbook.
//!
//! This module provides the CLI structure for the `schools` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, ListCommand, OutputFormat, ShowCommand,
    StatusCommand,
};

/// schools - Keep a register of schools
///
/// Add schools through a validated form, list them, and look at their
/// details. The list is saved locally between runs.
#[derive(Debug, Parser)]
#[command(name = "schools")]
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
    /// Add a school
    Add(AddCommand),

    /// List all schools
    List(ListCommand),

    /// Show the details of one school
    Show(ShowCommand),

    /// Start an interactive session
    Shell,

    /// Show storage status
    Status(StatusCommand),

    /// Remove every saved school
    Clear(ClearCommand),

    /// View or check configuration
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
