//! Error types for flashdeck.
//!
//! This module defines all error types used throughout the flashdeck crate.
//! The `Display` form carries diagnostic detail for logs, while
//! [`Error::user_message`] gives the short text shown in the shell.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for flashdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// Required input was missing or empty after trimming.
    #[error("{message}")]
    Validation {
        /// What was missing.
        message: String,
    },

    // === Authentication Errors ===
    /// Signup attempted with a username that is already taken.
    #[error("username already exists: {username}")]
    DuplicateUser {
        /// The rejected username.
        username: String,
    },

    /// Login attempted for a username that has no account.
    #[error("user not found: {username}")]
    UserNotFound {
        /// The unknown username.
        username: String,
    },

    /// The password did not match the stored one.
    #[error("incorrect password for {username}")]
    InvalidCredentials {
        /// The username whose password was wrong.
        username: String,
    },

    // === Card Errors ===
    /// A card position was outside the current list.
    #[error("card position {position} is out of bounds (len {len})")]
    Index {
        /// Requested position.
        position: usize,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// Navigation or lookup against an empty card list.
    #[error("no flashcards available")]
    EmptyStore,

    /// No card carries the given id.
    #[error("card not found: {0}")]
    CardNotFound(Uuid),

    // === Storage Errors ===
    /// A backing file could not be read or parsed.
    #[error("failed to read {path}: {message}")]
    StorageRead {
        /// The file that could not be read.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// A backing file could not be written.
    #[error("failed to write {path}: {source}")]
    StorageWrite {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === I/O Errors ===
    /// Terminal or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flashdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a storage read error.
    #[must_use]
    pub fn storage_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }

    /// Short, user-facing description of this error.
    ///
    /// Never includes paths or underlying OS errors.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::DuplicateUser { .. } => "Username already exists".to_string(),
            Self::UserNotFound { .. } => "User not found".to_string(),
            Self::InvalidCredentials { .. } => "Incorrect password".to_string(),
            Self::Index { .. } | Self::CardNotFound(_) => "That card no longer exists".to_string(),
            Self::EmptyStore => "No flashcards yet. Create one first.".to_string(),
            Self::StorageRead { .. } => "Saved data could not be read".to_string(),
            Self::StorageWrite { .. } | Self::DirectoryCreate { .. } => {
                "Changes could not be saved".to_string()
            }
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => {
                "Configuration problem".to_string()
            }
            Self::Io(_) | Self::Json(_) => "Something went wrong".to_string(),
        }
    }

    /// Check if this error is an authentication failure.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser { .. } | Self::UserNotFound { .. } | Self::InvalidCredentials { .. }
        )
    }

    /// Check if this error means persisted data may be out of date.
    #[must_use]
    pub fn is_storage_write(&self) -> bool {
        matches!(self, Self::StorageWrite { .. } | Self::DirectoryCreate { .. })
    }
}
