//! Error types for golfscore.
//!
//! Storage failures carry the path they happened on so the CLI can show a
//! useful message. Out-of-range player, hole and par values are not errors:
//! the model clamps them or ignores the request.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::MAX_COURSES;

/// The main error type for golfscore operations.
#[derive(Error, Debug)]
pub enum Error {
    // === State file errors ===
    /// The persisted round state could not be read.
    #[error("failed to read round state from {path}: {source}")]
    StateRead {
        /// Path to the state file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The persisted round state could not be written.
    #[error("failed to write round state to {path}: {source}")]
    StateWrite {
        /// Path to the state file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === History log errors ===
    /// A row could not be appended to the history log.
    #[error("failed to append to round history at {path}: {source}")]
    HistoryWrite {
        /// Path to the history log.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The history log could not be read.
    #[error("failed to read round history at {path}: {source}")]
    HistoryRead {
        /// Path to the history log.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The history log could neither be deleted nor truncated.
    #[error("failed to clear round history at {path}: {source}")]
    HistoryClear {
        /// Path to the history log.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Course preset errors ===
    /// A course slot index outside `0..MAX_COURSES`.
    #[error("course slot {slot} is out of range (0..{MAX_COURSES})")]
    SlotOutOfRange {
        /// The rejected slot index.
        slot: usize,
    },

    // === Configuration errors ===
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
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for golfscore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a slot out of range error.
    #[must_use]
    pub fn slot_out_of_range(slot: usize) -> Self {
        Self::SlotOutOfRange { slot }
    }

    /// Check if this error came from the storage medium rather than from input.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StateRead { .. }
                | Self::StateWrite { .. }
                | Self::HistoryWrite { .. }
                | Self::HistoryRead { .. }
                | Self::HistoryClear { .. }
                | Self::DirectoryCreate { .. }
        )
    }

    /// Text for the dialog shown when `action` fails.
    ///
    /// Storage failures get a short "Unable to ..." line; the details go to
    /// the log. Anything else is shown as is.
    #[must_use]
    pub fn dialog_message(&self, action: &str) -> String {
        if self.is_storage_error() {
            format!("Unable to {action}.")
        } else {
            self.to_string()
        }
    }
}
