//! Core certificate types for certrack.
//!
//! This module defines the certificate record persisted in the slot, its
//! status enumeration, and the small derivations applied to raw form input.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum length of the notes field, in characters.
pub const NOTES_MAX_LEN: usize = 500;

/// File extensions the file picker offers. Other extensions are still accepted.
pub const ACCEPTED_FILE_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "png", "jpg", "jpeg"];

/// Where a certification stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// The certificate has been awarded.
    Earned,
    /// Studying or exam underway.
    InProgress,
    /// Not started yet.
    #[default]
    Planned,
}

impl Status {
    /// All statuses, in the order the form offers them.
    pub const ALL: [Status; 3] = [Self::Planned, Self::InProgress, Self::Earned];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Earned => "Earned",
            Self::InProgress => "In Progress",
            Self::Planned => "Planned",
        }
    }

    /// Badge tone used when rendering this status.
    #[must_use]
    pub fn tone(self) -> Tone {
        match self {
            Self::Earned => Tone::Success,
            Self::InProgress => Tone::Warning,
            Self::Planned => Tone::Info,
        }
    }

    /// Badge glyph used when rendering this status.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Earned => "✓",
            Self::InProgress => "◷",
            Self::Planned => "▦",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Earned => write!(f, "earned"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Planned => write!(f, "planned"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earned" => Ok(Self::Earned),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "planned" => Ok(Self::Planned),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Positive outcome.
    Success,
    /// Something is underway.
    Warning,
    /// Neutral information.
    Info,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A tracked certification.
///
/// Records are created by submitting the form and never change afterwards.
/// Field order and key names match the persisted JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Opaque identifier derived from the creation time.
    pub id: String,

    /// Certificate name, e.g. "CompTIA Security+".
    pub name: String,

    /// Issuing body, e.g. "CompTIA".
    pub provider: String,

    /// Current status.
    #[serde(default)]
    pub status: Status,

    /// Completion percentage, 0 to 100.
    #[serde(default)]
    pub progress: u8,

    /// Date the certificate was earned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_earned: Option<String>,

    /// Date the certificate expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// Credential identifier issued by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,

    /// Study materials, one entry per line of the form input.
    #[serde(default)]
    pub study_materials: Vec<String>,

    /// Free-form notes.
    #[serde(default)]
    pub notes: String,

    /// Names of attached files. File contents are never stored.
    #[serde(default)]
    pub files: Vec<String>,
}

impl Certificate {
    /// Whether the certificate has an expiry date before `today`.
    ///
    /// Unparseable expiry dates are never considered expired.
    #[must_use]
    pub fn is_expired(&self, today: chrono::NaiveDate) -> bool {
        self.expiry_date
            .as_deref()
            .and_then(parse_date)
            .is_some_and(|expiry| expiry < today)
    }
}

/// Split multi-line study material input into entries.
///
/// Lines that are empty or whitespace-only are dropped; other lines are kept
/// as typed.
#[must_use]
pub fn parse_study_materials(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Reduce a picked file path to the name stored on the record.
#[must_use]
pub fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

/// Whether the file name carries one of the extensions the picker offers.
#[must_use]
pub fn has_accepted_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_FILE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}
