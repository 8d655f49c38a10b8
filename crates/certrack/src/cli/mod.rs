//! Command-line interface for certrack.
//!
//! This module provides the CLI structure and command handlers for the
//! `certrack` binary.

mod commands;
pub mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    parse_assignment, AddCommand, ConfigCommand, ListCommand, OutputFormat, StatusArg,
    SummaryCommand,
};

/// certrack - Track your certifications and progress
///
/// Keeps a local list of certifications with status, progress, dates,
/// study materials and attached file names.
#[derive(Debug, Parser)]
#[command(name = "certrack")]
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
    /// Add a certificate
    Add(AddCommand),

    /// List certificates, newest first
    List(ListCommand),

    /// Show counts, average progress and expired certificates
    Summary(SummaryCommand),

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
