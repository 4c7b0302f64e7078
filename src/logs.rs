//! Per-run log directories and the run summary.
//!
//! Every run writes into `<base>/sync-<timestamp>` (with a `-sim` suffix
//! when simulating). rsync writes one `job-<name>.log` per job there and the
//! runner appends one status line per job to `summary.log`.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::job::JobStatus;

/// Directory under the working directory that holds run logs.
pub const DEFAULT_LOG_BASE: &str = "logs";
/// Summary file name inside a run's log directory.
pub const SUMMARY_LOG_NAME: &str = "summary.log";

/// Name of the log directory for a run started at `started`.
pub fn log_dir_name(started: DateTime<Local>, simulate: bool) -> String {
    let stamp = started.format("%Y-%m-%dT%H-%M-%S");
    if simulate {
        format!("sync-{stamp}-sim")
    } else {
        format!("sync-{stamp}")
    }
}

/// Log directory of one run.
#[derive(Debug, Clone)]
pub struct RunLogs {
    dir: PathBuf,
}

impl RunLogs {
    /// Computes the log directory for a run without creating it.
    pub fn new(base: &Path, started: DateTime<Local>, simulate: bool) -> Self {
        Self {
            dir: base.join(log_dir_name(started, simulate)),
        }
    }

    /// Computes the log directory and creates it on disk.
    pub fn create(base: &Path, started: DateTime<Local>, simulate: bool) -> Result<Self> {
        let logs = Self::new(base, started, simulate);
        fs::create_dir_all(&logs.dir)?;
        Ok(logs)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the rsync log for job `name`.
    pub fn job_log(&self, name: &str) -> PathBuf {
        self.dir.join(format!("job-{name}.log"))
    }

    /// Opens `summary.log` for appending.
    pub fn summary(&self) -> Result<SummaryLog> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(SUMMARY_LOG_NAME))?;
        Ok(SummaryLog {
            writer: BufWriter::new(file),
        })
    }
}

/// Append-only record of job outcomes for one run.
pub struct SummaryLog {
    writer: BufWriter<File>,
}

impl SummaryLog {
    pub fn record(&mut self, job_name: &str, status: JobStatus) -> Result<()> {
        writeln!(
            self.writer,
            "{} STATUS [{job_name}]: {status}",
            Local::now().format("%Y/%m/%d %H:%M:%S")
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
