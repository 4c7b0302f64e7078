//! Checks run against a configuration before any job is executed.
//!
//! Three independent checks are exposed and composed by
//! [`crate::config::resolve`]:
//!
//! - [`validate_job_names`] rejects duplicate names and names containing a
//!   space or a non-ASCII character. Every violation is collected.
//! - [`validate_paths`] requires each job's source and target to sit under a
//!   declared source or target root. Every violation is collected.
//! - [`validate_job_paths`] rejects jobs whose paths overlap, with the
//!   exception of source paths carved out by an exclusion of the enclosing
//!   job. It reports the first conflicting pair.

use std::collections::HashSet;
use std::fmt;

use crate::config::{Config, PathRoot};
use crate::error::{Error, Result};
use crate::job::Job;
use crate::path::{has_prefix, join, normalize};

/// Which side of a job a path check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Source,
    Target,
}

impl PathKind {
    fn of(self, job: &Job) -> &str {
        match self {
            PathKind::Source => &job.source,
            PathKind::Target => &job.target,
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::Source => f.write_str("source"),
            PathKind::Target => f.write_str("target"),
        }
    }
}

/// Rejects duplicate job names and names containing a space or any
/// character above `0x7f`.
pub fn validate_job_names(jobs: &[Job]) -> Result<()> {
    let mut violations = vec![];
    let mut names = HashSet::new();

    for job in jobs {
        if !names.insert(job.name.as_str()) {
            violations.push(format!("duplicate job name: {}", job.name));
        }
        if job.name.chars().any(|c| !c.is_ascii() || c == ' ') {
            violations.push(format!("invalid characters in job name: {}", job.name));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::JobName { violations })
    }
}

/// Checks that `job_path` lies under one of `roots`.
///
/// Returns the violation message on failure so callers can aggregate it.
pub fn validate_path(
    job_path: &str,
    roots: &[PathRoot],
    kind: PathKind,
    job_name: &str,
) -> std::result::Result<(), String> {
    if roots.iter().any(|root| has_prefix(job_path, &root.path)) {
        Ok(())
    } else {
        Err(format!("invalid {kind} path for job '{job_name}': {job_path}"))
    }
}

/// Checks every job's source against `config.sources` and target against
/// `config.targets`.
pub fn validate_paths(config: &Config) -> Result<()> {
    let mut violations = vec![];

    for job in &config.jobs {
        if let Err(violation) = validate_path(&job.source, &config.sources, PathKind::Source, &job.name) {
            violations.push(violation);
        }
        if let Err(violation) = validate_path(&job.target, &config.targets, PathKind::Target, &job.name) {
            violations.push(violation);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::PathContainment { violations })
    }
}

/// Rejects any ordered pair of distinct jobs where the first job's path is
/// prefixed by the second's.
///
/// For source paths the conflict is forgiven when the first path falls under
/// one of the second job's exclusions. Both orderings of every pair are
/// checked because that carve-out only applies in one direction.
pub fn validate_job_paths(jobs: &[Job], kind: PathKind) -> Result<()> {
    for (i, job1) in jobs.iter().enumerate() {
        for (j, job2) in jobs.iter().enumerate() {
            if i == j {
                continue;
            }
            let path1 = normalize(kind.of(job1));
            let path2 = normalize(kind.of(job2));

            let excluded = kind == PathKind::Source
                && job2
                    .exclusions
                    .iter()
                    .any(|exclusion| path1.starts_with(&join(&job2.source, exclusion)));

            if !excluded && path1.starts_with(&path2) {
                return Err(Error::PathOverlap {
                    job: job1.name.clone(),
                    other: job2.name.clone(),
                    kind,
                });
            }
        }
    }
    Ok(())
}
