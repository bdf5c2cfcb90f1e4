//! Error types shared by the catalog crates

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No profile definition carries the requested name
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// `sync` or a metrics refresh was asked for a project that was never deployed
    #[error("No project profile found in {}. Deploy with a profile first.", .0.display())]
    NoProfileRecorded(PathBuf),

    /// Target project directory is missing
    #[error("Project path does not exist: {}", .0.display())]
    ProjectNotFound(PathBuf),

    /// Outcome string outside `accepted`, `rejected`, `iteration`
    #[error("Invalid outcome '{0}' (expected accepted, rejected or iteration)")]
    InvalidOutcome(String),

    /// Feedback event failed validation
    #[error("Invalid feedback: {0}")]
    InvalidFeedback(String),

    /// Profile definition parsed but is unusable
    #[error("Invalid profile {}: {reason}", .path.display())]
    InvalidProfile {
        /// Definition file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
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

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Build a `map_err` adapter that attaches `path` to an I/O error
    pub fn fs(path: &Path) -> impl FnOnce(std::io::Error) -> CatalogError + '_ {
        move |source| CatalogError::Fs {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
