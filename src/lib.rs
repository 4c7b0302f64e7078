//! backup-rsync: declarative rsync backups.
//!
//! This crate resolves a YAML backup configuration into a validated set of
//! jobs, hands those jobs to rsync, and reports source directories that no
//! job covers.

pub mod config;
pub mod coverage;
pub mod error;
pub mod job;
pub mod logs;
pub mod path;
pub mod rsync;
pub mod sysexits;
pub mod validate;

pub use config::{Config, PathRoot};
pub use error::{Error, Result};
pub use job::{Job, JobStatus};
