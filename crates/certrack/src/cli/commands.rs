//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::certificate::{file_name_of, Status};
use crate::error::Result;
use crate::form::Field;

/// Add command arguments.
///
/// Each flag fills the matching form field; unset flags keep the form default.
#[derive(Debug, Default, Args)]
pub struct AddCommand {
    /// Certificate name (e.g. "CompTIA Security+")
    #[arg(short, long, required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Issuing provider (e.g. "CompTIA", "Cisco", "EC-Council")
    #[arg(short, long, required_unless_present = "interactive")]
    pub provider: Option<String>,

    /// Current status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Completion percentage (0-100)
    #[arg(long)]
    pub progress: Option<u32>,

    /// Date earned (YYYY-MM-DD)
    #[arg(long)]
    pub date_earned: Option<String>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expiry_date: Option<String>,

    /// Credential ID issued by the provider
    #[arg(long)]
    pub credential_id: Option<String>,

    /// A study material entry (repeatable)
    #[arg(short, long = "material", value_name = "MATERIAL")]
    pub materials: Vec<String>,

    /// Study materials as multi-line text, one entry per line
    #[arg(long = "materials", value_name = "TEXT", conflicts_with = "materials")]
    pub materials_text: Option<String>,

    /// Notes (up to 500 characters)
    #[arg(long)]
    pub notes: Option<String>,

    /// Attach a file by path; only its name is recorded (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Fill in the form interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format for the added record
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl AddCommand {
    /// The field assignments requested by the flags, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(Field::Name(name.clone()));
        }
        if let Some(provider) = &self.provider {
            fields.push(Field::Provider(provider.clone()));
        }
        if let Some(status) = self.status {
            fields.push(Field::Status(status.into()));
        }
        if let Some(progress) = self.progress {
            fields.push(Field::Progress(progress));
        }
        if let Some(date) = &self.date_earned {
            fields.push(Field::DateEarned(date.clone()));
        }
        if let Some(date) = &self.expiry_date {
            fields.push(Field::ExpiryDate(date.clone()));
        }
        if let Some(credential) = &self.credential_id {
            fields.push(Field::CredentialId(credential.clone()));
        }
        if let Some(text) = &self.materials_text {
            fields.push(Field::StudyMaterials(text.clone()));
        } else if !self.materials.is_empty() {
            fields.push(Field::StudyMaterials(self.materials.join("\n")));
        }
        if let Some(notes) = &self.notes {
            fields.push(Field::Notes(notes.clone()));
        }
        fields
    }

    /// File names to attach, taken from the last component of each path.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|path| file_name_of(&path.to_string_lossy()))
            .collect()
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show certificates with this status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

/// Status argument for adding and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Certificate awarded
    Earned,
    /// Studying or exam underway
    InProgress,
    /// Not started
    Planned,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Earned => Self::Earned,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Planned => Self::Planned,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

/// Parse a `key=value` field assignment.
///
/// # Errors
///
/// Returns an error if the text has no `=` or the field assignment is invalid.
pub fn parse_assignment(text: &str) -> Result<Field> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| crate::error::Error::invalid_field(text, ""))?;
    Field::parse(key, value)
}
