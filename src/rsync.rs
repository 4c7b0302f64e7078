//! The rsync collaborator that carries out resolved jobs.
//!
//! Process spawning sits behind [`Executor`] so tests can script tool output.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::job::{Job, JobCommand, JobStatus};

/// rsync binary used when none is configured.
pub const DEFAULT_RSYNC_PATH: &str = "/usr/bin/rsync";

const VERSION_FLAG: &str = "--version";

/// Runs an external program and returns its combined stdout and stderr.
pub trait Executor {
    fn execute(&self, program: &str, args: &[String]) -> Result<Vec<u8>>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsExec;

impl Executor for OsExec {
    fn execute(&self, program: &str, args: &[String]) -> Result<Vec<u8>> {
        let command_line = format!("{program} {}", args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::CommandFailed {
                command: command_line.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(Error::CommandFailed {
                command: command_line,
                source: std::io::Error::other(format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&combined).trim_end()
                )),
            })
        }
    }
}

/// What [`RsyncCommand`] does with a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Transfer for real.
    Sync,
    /// Pass `--dry-run`.
    Simulate,
    /// Print the command line, run nothing.
    List,
}

/// Builds and runs the rsync invocation for a job.
#[derive(Debug, Clone)]
pub struct RsyncCommand<E: Executor = OsExec> {
    pub bin_path: PathBuf,
    pub mode: Mode,
    pub executor: E,
}

impl RsyncCommand<OsExec> {
    pub fn new(bin_path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self::with_executor(bin_path, mode, OsExec)
    }
}

impl<E: Executor> RsyncCommand<E> {
    pub fn with_executor(bin_path: impl Into<PathBuf>, mode: Mode, executor: E) -> Self {
        Self {
            bin_path: bin_path.into(),
            mode,
            executor,
        }
    }

    fn program(&self) -> String {
        self.bin_path.to_string_lossy().into_owned()
    }

    /// Arguments passed to rsync for `job`.
    pub fn arguments_for_job(&self, job: &Job, log_path: Option<&Path>) -> Vec<String> {
        let mut args = vec![];
        if self.mode == Mode::Simulate {
            args.push("--dry-run".to_string());
        }
        args.push("-aiv".to_string());
        args.push("--stats".to_string());
        if job.delete {
            args.push("--delete".to_string());
        }
        if let Some(log_path) = log_path {
            args.push(format!("--log-file={}", log_path.display()));
        }
        for exclusion in &job.exclusions {
            args.push(format!("--exclude={exclusion}"));
        }
        args.push(job.source.clone());
        args.push(job.target.clone());
        args
    }

    /// Returns the `--version` banner of the configured binary.
    ///
    /// The binary path must be absolute and the banner must look like rsync's.
    pub fn version_info(&self) -> Result<String> {
        if !self.bin_path.is_absolute() {
            return Err(Error::InvalidRsyncPath(self.program()));
        }

        let output = self
            .executor
            .execute(&self.program(), &[VERSION_FLAG.to_string()])?;
        let output = String::from_utf8_lossy(&output).into_owned();

        if !output.contains("rsync") || !output.contains("protocol version") {
            return Err(Error::InvalidRsyncVersion(output));
        }
        Ok(output)
    }
}

impl<E: Executor> JobCommand for RsyncCommand<E> {
    fn run(&self, job: &Job, log_path: Option<&Path>) -> JobStatus {
        let args = self.arguments_for_job(job, log_path);
        println!("Job: {}", job.name);
        println!("Command: {} {}", self.program(), args.join(" "));

        if self.mode == Mode::List {
            return JobStatus::Success;
        }

        match self.executor.execute(&self.program(), &args) {
            Ok(output) => {
                println!("Output:\n{}", String::from_utf8_lossy(&output));
                JobStatus::Success
            }
            Err(e) => {
                log::error!("job '{}' failed: {e}", job.name);
                JobStatus::Failure
            }
        }
    }
}
