//! Error types for schoolbook.
//!
//! This module defines all error types used throughout the schoolbook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// The main error type for schoolbook operations.
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

    /// The persisted slot holds something other than a list of schools.
    #[error("slot '{key}' does not hold a list of schools: {message}")]
    SlotMalformed {
        /// Key of the slot that was read.
        key: String,
        /// Description of what went wrong.
        message: String,
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

    // === Record Errors ===
    /// A candidate school failed field validation.
    ///
    /// The field errors are carried in the payload, not in the message.
    #[error("school not added")]
    Validation(ValidationErrors),

    /// An image could not be turned into a reference.
    #[error("invalid image {path}: {message}")]
    Image {
        /// Path of the selected image file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// No school exists at the requested position.
    #[error("no school at position {position} (have {len})")]
    NotFound {
        /// The 1-based position that was requested.
        position: usize,
        /// Number of schools currently stored.
        len: usize,
    },

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

/// A specialized Result type for schoolbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an image reference error.
    #[must_use]
    pub fn image(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Image {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed slot error.
    #[must_use]
    pub fn slot_malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SlotMalformed {
            key: key.into(),
            message: message.into(),
        }
    }
}
