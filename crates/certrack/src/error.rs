//! Error types for certrack.
//!
//! This module defines all error types used throughout the certrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for certrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The persisted slot holds content that is not a record array.
    #[error("slot '{key}' holds malformed content: {source}")]
    CorruptSlot {
        /// Key of the slot that failed to parse.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// No numeric id is left above the newest one issued.
    #[error("record ids exhausted: no id follows {last}")]
    IdsExhausted {
        /// The newest id already issued or loaded.
        last: i64,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Form Errors ===
    /// A required draft field was left blank.
    #[error("{field} is required")]
    FieldRequired {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Progress was outside 0..=100.
    #[error("progress must be between 0 and 100, got {value}")]
    ProgressOutOfRange {
        /// The rejected value.
        value: u32,
    },

    /// Notes exceeded the maximum length.
    #[error("notes are {len} characters long, maximum is {max}")]
    NotesTooLong {
        /// Length of the rejected notes, in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A date field did not hold a `YYYY-MM-DD` date.
    #[error("{field} must be a YYYY-MM-DD date, got '{value}'")]
    InvalidDate {
        /// Name of the date field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A status string did not name a known status.
    #[error("unknown status '{0}' (expected earned, in-progress or planned)")]
    UnknownStatus(String),

    /// A field name was unknown or its value could not be converted.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField {
        /// The field name as given.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// A file index did not refer to an attached file.
    #[error("no file at index {index} (draft has {len} files)")]
    FileIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of files in the draft.
        len: usize,
    },

    /// A form operation was attempted while the form was closed.
    #[error("the certificate form is not open")]
    FormClosed,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for certrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a required-field error.
    #[must_use]
    pub fn field_required(field: &'static str) -> Self {
        Self::FieldRequired { field }
    }

    /// Create an invalid-date error.
    #[must_use]
    pub fn invalid_date(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field,
            value: value.into(),
        }
    }

    /// Create an invalid-field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a corrupt-slot error.
    #[must_use]
    pub fn corrupt_slot(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptSlot {
            key: key.into(),
            source,
        }
    }

    /// Check if this error was raised by draft validation.
    ///
    /// Validation errors leave the store and the slot untouched.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::FieldRequired { .. }
                | Self::ProgressOutOfRange { .. }
                | Self::NotesTooLong { .. }
                | Self::InvalidDate { .. }
                | Self::UnknownStatus(_)
                | Self::InvalidField { .. }
        )
    }

    /// Check if this error reports malformed slot content.
    #[must_use]
    pub fn is_corrupt_slot(&self) -> bool {
        matches!(self, Self::CorruptSlot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FormClosed;
        assert_eq!(err.to_string(), "the certificate form is not open");

        let err = Error::field_required("name");
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::field_required("provider").is_validation_error());
        assert!(Error::ProgressOutOfRange { value: 101 }.is_validation_error());
        assert!(Error::NotesTooLong { len: 501, max: 500 }.is_validation_error());
        assert!(Error::invalid_date("dateEarned", "yesterday").is_validation_error());
        assert!(Error::UnknownStatus("done".to_string()).is_validation_error());
        assert!(Error::invalid_field("colour", "red").is_validation_error());
        assert!(!Error::FormClosed.is_validation_error());
    }

    #[test]
    fn test_is_corrupt_slot() {
        let parse_err = serde_json::from_str::<Vec<i32>>("{oops").unwrap_err();
        let err = Error::corrupt_slot("certificates", parse_err);
        assert!(err.is_corrupt_slot());
        assert!(err.to_string().contains("certificates"));
        assert!(!Error::FormClosed.is_corrupt_slot());
    }

    #[test]
    fn test_progress_out_of_range_display() {
        let err = Error::ProgressOutOfRange { value: 150 };
        assert!(err.to_string().contains("150"));
    }

    #[test]
    fn test_notes_too_long_display() {
        let err = Error::NotesTooLong { len: 600, max: 500 };
        let msg = err.to_string();
        assert!(msg.contains("600"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::invalid_date("expiryDate", "2024/01/01");
        let msg = err.to_string();
        assert!(msg.contains("expiryDate"));
        assert!(msg.contains("2024/01/01"));
    }

    #[test]
    fn test_file_index_out_of_range_display() {
        let err = Error::FileIndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "no file at index 3 (draft has 2 files)");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "slot_key must not be empty".to_string(),
        };
        assert!(err.to_string().contains("slot_key"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
