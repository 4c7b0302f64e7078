use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A named source → target synchronization unit.
///
/// `delete` and `enabled` default to `true` when omitted from the YAML; the
/// distinction between "omitted" and "explicitly false" only exists in
/// [`RawJob`] and is gone by the time a `Job` is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawJob")]
pub struct Job {
    /// Unique job name, ASCII without spaces.
    pub name: String,
    /// Source directory, may contain `${var}` placeholders before resolution.
    pub source: String,
    /// Target directory, may contain `${var}` placeholders before resolution.
    pub target: String,
    /// Pass `--delete` to rsync.
    pub delete: bool,
    /// Disabled jobs are reported as skipped and never executed.
    pub enabled: bool,
    /// Sub-paths of `source` this job does not back up.
    pub exclusions: Vec<String>,
}

/// Job as it appears on the wire, before defaults are applied.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawJob {
    name: String,
    source: String,
    target: String,
    delete: Option<bool>,
    enabled: Option<bool>,
    exclusions: Vec<String>,
}

impl From<RawJob> for Job {
    fn from(raw: RawJob) -> Self {
        Self {
            name: raw.name,
            source: raw.source,
            target: raw.target,
            delete: raw.delete.unwrap_or(true),
            enabled: raw.enabled.unwrap_or(true),
            exclusions: raw.exclusions,
        }
    }
}

impl Job {
    /// Creates an enabled, deleting job with no exclusions.
    pub fn new(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
            delete: true,
            enabled: true,
            exclusions: vec![],
        }
    }

    /// Hands the job to `command` unless it is disabled.
    pub fn apply<C: JobCommand + ?Sized>(&self, command: &C, log_path: Option<&Path>) -> JobStatus {
        if !self.enabled {
            return JobStatus::Skipped;
        }
        command.run(self, log_path)
    }
}

/// Outcome of handing a job to the synchronization tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Failure,
    Skipped,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Success => "SUCCESS",
            JobStatus::Failure => "FAILURE",
            JobStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

/// Something that can carry out a resolved job.
pub trait JobCommand {
    fn run(&self, job: &Job, log_path: Option<&Path>) -> JobStatus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingCommand {
        calls: Cell<usize>,
        status: JobStatus,
    }

    impl JobCommand for CountingCommand {
        fn run(&self, _job: &Job, _log_path: Option<&Path>) -> JobStatus {
            self.calls.set(self.calls.get() + 1);
            self.status
        }
    }

    #[test]
    fn test_defaults_when_fields_omitted() {
        let yaml = r#"
name: "test_job"
source: "/source"
target: "/target"
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(job, Job::new("test_job", "/source", "/target"));
    }

    #[test]
    fn test_explicit_false_is_preserved() {
        let yaml = r#"
name: "test_job"
source: "/source"
target: "/target"
delete: false
enabled: false
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert!(!job.delete);
        assert!(!job.enabled);
    }

    #[test]
    fn test_mixed_values() {
        let yaml = r#"
name: "test_job"
source: "/source"
target: "/target"
delete: false
exclusions: ["*.tmp", "cache/"]
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert!(!job.delete);
        assert!(job.enabled);
        assert_eq!(job.exclusions, vec!["*.tmp", "cache/"]);
    }

    #[test]
    fn test_serialized_job_has_plain_booleans() {
        let mut job = Job::new("a", "/s", "/t");
        job.enabled = false;
        let yaml = serde_yaml::to_string(&job).unwrap();
        assert!(yaml.contains("delete: true"));
        assert!(yaml.contains("enabled: false"));
        let back: Job = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn test_apply_skips_disabled_job_without_running() {
        let command = CountingCommand {
            calls: Cell::new(0),
            status: JobStatus::Success,
        };
        let mut job = Job::new("disabled_job", "/home/disabled/", "/mnt/backup1/disabled/");
        job.enabled = false;

        assert_eq!(job.apply(&command, None), JobStatus::Skipped);
        assert_eq!(command.calls.get(), 0);
    }

    #[test]
    fn test_apply_runs_enabled_job() {
        let command = CountingCommand {
            calls: Cell::new(0),
            status: JobStatus::Failure,
        };
        let job = Job::new("test_job", "/home/test/", "/mnt/backup1/test/");

        assert_eq!(job.apply(&command, None), JobStatus::Failure);
        assert_eq!(command.calls.get(), 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Success.to_string(), "SUCCESS");
        assert_eq!(JobStatus::Failure.to_string(), "FAILURE");
        assert_eq!(JobStatus::Skipped.to_string(), "SKIPPED");
    }
}
