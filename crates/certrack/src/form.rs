//! Draft state for the "add certificate" form.
//!
//! A [`Draft`] holds the raw values the user is editing. It becomes a
//! [`Certificate`] only through [`Draft::to_certificate`], which validates
//! and normalizes it.

use std::str::FromStr;

use tracing::warn;

use crate::certificate::{
    has_accepted_extension, parse_date, parse_study_materials, Certificate, Status, NOTES_MAX_LEN,
};
use crate::error::{Error, Result};

/// A single field assignment on the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Certificate name.
    Name(String),
    /// Issuing provider.
    Provider(String),
    /// Current status.
    Status(Status),
    /// Completion percentage. Checked against 0..=100 on submit.
    Progress(u32),
    /// Date earned, `YYYY-MM-DD` or empty.
    DateEarned(String),
    /// Expiry date, `YYYY-MM-DD` or empty.
    ExpiryDate(String),
    /// Credential id or empty.
    CredentialId(String),
    /// Study materials, one per line.
    StudyMaterials(String),
    /// Free-form notes.
    Notes(String),
}

impl Field {
    /// Field names accepted by [`Field::parse`].
    pub const NAMES: [&'static str; 9] = [
        "name",
        "provider",
        "status",
        "progress",
        "date-earned",
        "expiry-date",
        "credential-id",
        "materials",
        "notes",
    ];

    /// Build a field assignment from a textual key and value.
    ///
    /// Keys are matched case-insensitively; `_` and `-` are interchangeable
    /// and the camelCase record key names are also accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStatus`] for a bad status and
    /// [`Error::InvalidField`] for unknown keys or non-numeric progress.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        let field = match normalized.as_str() {
            "name" => Self::Name(value.to_string()),
            "provider" => Self::Provider(value.to_string()),
            "status" => Self::Status(Status::from_str(value)?),
            "progress" => {
                let progress = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| Error::invalid_field("progress", value))?;
                Self::Progress(progress)
            }
            "date-earned" | "dateearned" => Self::DateEarned(value.to_string()),
            "expiry-date" | "expirydate" => Self::ExpiryDate(value.to_string()),
            "credential-id" | "credentialid" => Self::CredentialId(value.to_string()),
            "materials" | "study-materials" | "studymaterials" => {
                Self::StudyMaterials(value.to_string())
            }
            "notes" => Self::Notes(value.to_string()),
            _ => return Err(Error::invalid_field(key, value)),
        };
        Ok(field)
    }
}

/// The certificate being edited in the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Certificate name.
    pub name: String,
    /// Issuing provider.
    pub provider: String,
    /// Current status.
    pub status: Status,
    /// Completion percentage.
    pub progress: u32,
    /// Date earned, as typed.
    pub date_earned: String,
    /// Expiry date, as typed.
    pub expiry_date: String,
    /// Credential id, as typed.
    pub credential_id: String,
    /// Study materials, one per line.
    pub study_materials: String,
    /// Free-form notes.
    pub notes: String,
    /// Names of attached files.
    pub files: Vec<String>,
}

impl Draft {
    /// Create a draft with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field.
    pub fn set(&mut self, field: Field) {
        match field {
            Field::Name(v) => self.name = v,
            Field::Provider(v) => self.provider = v,
            Field::Status(v) => self.status = v,
            Field::Progress(v) => self.progress = v,
            Field::DateEarned(v) => self.date_earned = v,
            Field::ExpiryDate(v) => self.expiry_date = v,
            Field::CredentialId(v) => self.credential_id = v,
            Field::StudyMaterials(v) => self.study_materials = v,
            Field::Notes(v) => self.notes = v,
        }
    }

    /// Append file names in the order given. Duplicates are kept.
    pub fn add_files<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !has_accepted_extension(&name) {
                warn!(file = %name, "File type is not one of the suggested formats");
            }
            self.files.push(name);
        }
    }

    /// Remove the file at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileIndexOutOfRange`] if there is no such file; the
    /// draft is left unchanged.
    pub fn remove_file(&mut self, index: usize) -> Result<String> {
        if index >= self.files.len() {
            return Err(Error::FileIndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    /// Check the draft against the form's constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::field_required("name"));
        }
        if self.provider.trim().is_empty() {
            return Err(Error::field_required("provider"));
        }
        if self.progress > 100 {
            return Err(Error::ProgressOutOfRange {
                value: self.progress,
            });
        }
        let notes_len = self.notes.chars().count();
        if notes_len > NOTES_MAX_LEN {
            return Err(Error::NotesTooLong {
                len: notes_len,
                max: NOTES_MAX_LEN,
            });
        }
        for (field, value) in [
            ("dateEarned", &self.date_earned),
            ("expiryDate", &self.expiry_date),
        ] {
            let value = value.trim();
            if !value.is_empty() && parse_date(value).is_none() {
                return Err(Error::invalid_date(field, value));
            }
        }
        Ok(())
    }

    /// Validate the draft and turn it into a record with the given id.
    ///
    /// Blank optional strings become absent and study materials are split
    /// into lines.
    ///
    /// # Errors
    ///
    /// Returns a validation error if [`Draft::validate`] fails.
    pub fn to_certificate(&self, id: String) -> Result<Certificate> {
        self.validate()?;

        // validate() has bounded progress to 0..=100
        let progress = u8::try_from(self.progress).map_err(|_| Error::ProgressOutOfRange {
            value: self.progress,
        })?;

        Ok(Certificate {
            id,
            name: self.name.trim().to_string(),
            provider: self.provider.trim().to_string(),
            status: self.status,
            progress,
            date_earned: non_blank(&self.date_earned),
            expiry_date: non_blank(&self.expiry_date),
            credential_id: non_blank(&self.credential_id),
            study_materials: parse_study_materials(&self.study_materials),
            notes: self.notes.clone(),
            files: self.files.clone(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
