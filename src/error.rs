//! Error taxonomy for a pull run.
//!
//! Every variant here terminates the run before the artifact writer is
//! reached. ICU parse failures are deliberately absent: they are reported
//! as diagnostics by the consistency checker and never propagate.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = PullError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PullError {
    /// Invalid options, detected before any network activity
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response
    #[error("Failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status. `body` is the raw
    /// response text, which is not necessarily JSON.
    #[error("Tolgee API error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The request succeeded but the body did not have the expected shape
    #[error("Malformed response from {endpoint}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Requested languages do not exist in the project: {}", .0.join(", "))]
    NonexistentLanguages(Vec<String>),

    #[error("Failed to read export archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid resource file {path}")]
    InvalidResourceFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize resources")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl PullError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
