//! Backup configuration: loading, variable substitution and resolution.
//!
//! A configuration declares source and target roots, a flat set of
//! variables and the jobs to run. [`resolve`] turns a freshly loaded
//! configuration into one whose job paths are substituted and validated,
//! failing on the first stage that reports a problem.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::job::Job;
use crate::validate::{self, PathKind};

/// A declared source or target boundary.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PathRoot {
    pub path: String,
    /// Sub-paths of `path` that never need to be covered by a job.
    pub exclusions: Vec<String>,
}

impl PathRoot {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exclusions: vec![],
        }
    }

    pub fn with_exclusions<I, S>(path: impl Into<String>, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            exclusions: exclusions.into_iter().map(Into::into).collect(),
        }
    }
}

/// The whole backup configuration as stored in YAML.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub sources: Vec<PathRoot>,
    pub targets: Vec<PathRoot>,
    pub variables: BTreeMap<String, String>,
    pub jobs: Vec<Job>,
}

impl Config {
    /// Decodes a configuration from YAML without resolving it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Renders the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Replaces every `${key}` in `input` with its value from `variables`.
///
/// Placeholders with no matching variable are left untouched.
pub fn substitute_variables(input: &str, variables: &BTreeMap<String, String>) -> String {
    let mut output = input.to_string();
    for (key, value) in variables {
        let placeholder = format!("${{{key}}}");
        output = output.replace(&placeholder, value);
    }
    output
}

/// Resolves a loaded configuration into an executable one.
///
/// Stages run in a fixed order and the first failure is returned:
/// job names, variable substitution, root containment, source overlap,
/// target overlap.
pub fn resolve(mut config: Config) -> Result<Config> {
    validate::validate_job_names(&config.jobs)?;

    for job in &mut config.jobs {
        job.source = substitute_variables(&job.source, &config.variables);
        job.target = substitute_variables(&job.target, &config.variables);
    }

    validate::validate_paths(&config)?;
    validate::validate_job_paths(&config.jobs, PathKind::Source)?;
    validate::validate_job_paths(&config.jobs, PathKind::Target)?;

    log::debug!("resolved {} job(s)", config.jobs.len());
    Ok(config)
}

/// Reads, decodes and resolves the configuration file at `path`.
pub fn load_resolved_config(path: &Path) -> Result<Config> {
    let file = fs::File::open(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_reader(file)?;
    resolve(config)
}
