//! Error types for catalog sync

use agentcat_types::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

/// Sync errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// External command could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// External command exceeded its time limit
    #[error("'{program}' timed out after {secs}s")]
    Timeout {
        /// Program name
        program: String,
        /// Limit in seconds
        secs: u64,
    },

    /// External command exited unsuccessfully
    #[error("'{program}' failed: {stderr}")]
    CommandFailed {
        /// Program name
        program: String,
        /// Captured standard error
        stderr: String,
    },

    /// Filesystem error with the path that caused it
    #[error("I/O error at {}: {source}", .path.display())]
    Fs {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed remote response
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid name pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Catalog-level failure while copying artifacts
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SyncError {
    pub(crate) fn fs(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> SyncError + '_ {
        move |source| SyncError::Fs {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SyncError>;
