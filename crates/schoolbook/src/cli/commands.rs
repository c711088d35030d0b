//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

pub use crate::render::OutputFormat;

/// Add command arguments.
///
/// Every field is optional on the command line so that missing values are
/// reported by the form validator, beside the field they belong to.
#[derive(Debug, Default, Args)]
pub struct AddCommand {
    /// School name
    #[arg(long)]
    pub name: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// State
    #[arg(long)]
    pub state: Option<String>,

    /// Ten-digit contact number
    #[arg(long)]
    pub contact: Option<String>,

    /// Contact email address
    #[arg(long, visible_alias = "email-id")]
    pub email: Option<String>,

    /// Image file to attach
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Position of the school in the list (starting at 1)
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub position: u64,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
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
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
