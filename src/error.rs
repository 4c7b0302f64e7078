//! Error types for configuration resolution, coverage analysis and job
//! execution.
//!
//! Validation stages that collect several violations (job names, root
//! containment) carry the whole list so a single failure can report every
//! offending job. Overlap detection stops at the first conflicting pair.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::PathKind;

/// Unified result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors raised by the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Duplicate job names or names with characters outside printable ASCII.
    #[error("job validation failed: {}", violations.join("; "))]
    JobName { violations: Vec<String> },

    /// A job source or target is not under any declared root.
    #[error("path validation failed: {}", violations.join("; "))]
    PathContainment { violations: Vec<String> },

    /// Two jobs claim overlapping source or target paths.
    #[error("overlapping path detected: job '{job}' has a {kind} path overlapping with job '{other}'")]
    PathOverlap {
        job: String,
        other: String,
        kind: PathKind,
    },

    /// Listing a directory failed during coverage analysis.
    #[error("could not get child directories of '{path}': {source}")]
    FilesystemRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be opened or read.
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to decode YAML: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("rsync path must be an absolute path: \"{0}\"")]
    InvalidRsyncPath(String),

    #[error("invalid rsync version output: {0}")]
    InvalidRsyncVersion(String),

    /// An external command could not be run or exited unsuccessfully.
    #[error("failed to execute command '{command}': {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// True for the three validation failures raised while resolving a config.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::JobName { .. } | Error::PathContainment { .. } | Error::PathOverlap { .. }
        )
    }
}
