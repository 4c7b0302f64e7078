//! Command-line interface definition for backup.
//!
//! This module defines the CLI, its subcommands, and the handlers that load
//! the resolved configuration and hand it to rsync or the coverage check.

use anyhow::{Context, Result};
use backup_rsync::config::{self, Config};
use backup_rsync::coverage::{self, OsFs};
use backup_rsync::logs::{DEFAULT_LOG_BASE, RunLogs};
use backup_rsync::path::expand_home;
use backup_rsync::rsync::{DEFAULT_RSYNC_PATH, Mode, RsyncCommand};
use backup_rsync::{Error, sysexits};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for backup.
#[derive(Parser, Debug)]
#[command(name = "backup", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.yaml")]
    pub config: String,
    /// Absolute path to the rsync binary.
    #[arg(long, global = true, default_value = DEFAULT_RSYNC_PATH)]
    pub rsync_path: PathBuf,
    /// Directory that receives per-run log directories.
    #[arg(long, global = true, default_value = DEFAULT_LOG_BASE)]
    pub log_dir: PathBuf,
    /// Log filter (error, warn, info, debug, trace or a RUST_LOG-style filter).
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
    /// Subcommand to execute.
    #[command(subcommand)]
    pub commands: Commands,
}

/// Supported backup commands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Manage configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Execute the sync jobs.
    Run,
    /// Simulate the sync jobs with rsync --dry-run.
    Simulate,
    /// List the commands that will be executed.
    List,
    /// List source directories that no job covers.
    CheckCoverage,
    /// Print the rsync binary path and its version banner.
    Version,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Show the resolved configuration.
    Show,
    /// Validate the configuration.
    Validate,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        expand_home(&self.config)
    }

    fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        config::load_resolved_config(&path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))
    }
}

/// Dispatches to the handler of the parsed subcommand.
pub(crate) fn execute(cli: Cli) -> Result<()> {
    match &cli.commands {
        Commands::Config { action } => match action {
            ConfigAction::Show => show_config(&cli),
            ConfigAction::Validate => validate_config(&cli),
        },
        Commands::Run => execute_sync_jobs(&cli, Mode::Sync),
        Commands::Simulate => execute_sync_jobs(&cli, Mode::Simulate),
        Commands::List => list_commands(&cli),
        Commands::CheckCoverage => check_coverage(&cli),
        Commands::Version => version(&cli),
    }
}

/// Prints the resolved configuration as YAML.
fn show_config(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let yaml = config
        .to_yaml()
        .context("Failed to render resolved configuration")?;
    println!("Resolved Configuration:\n{yaml}");
    Ok(())
}

fn validate_config(cli: &Cli) -> Result<()> {
    cli.load_config()?;
    println!("Configuration is valid.");
    Ok(())
}

/// Runs every job through rsync in `mode` and records each outcome in the
/// run's summary log.
fn execute_sync_jobs(cli: &Cli, mode: Mode) -> Result<()> {
    let config = cli.load_config()?;
    let logs = RunLogs::create(&cli.log_dir, Local::now(), mode == Mode::Simulate)
        .context("Failed to create log directory")?;
    let mut summary = logs.summary().context("Failed to open summary log")?;
    let rsync = RsyncCommand::new(&cli.rsync_path, mode);

    for job in &config.jobs {
        let job_log = logs.job_log(&job.name);
        let status = job.apply(&rsync, Some(&job_log));
        summary
            .record(&job.name, status)
            .context("Failed to write summary log")?;
        println!("Status [{}]: {status}", job.name);
    }
    Ok(())
}

/// Prints the rsync command line of every job without running anything.
fn list_commands(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let logs = RunLogs::new(&cli.log_dir, Local::now(), false);
    let rsync = RsyncCommand::new(&cli.rsync_path, Mode::List);

    for job in &config.jobs {
        job.apply(&rsync, Some(&logs.job_log(&job.name)));
    }
    Ok(())
}

fn check_coverage(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let uncovered = coverage::list_uncovered_paths(&OsFs, &config);

    println!("Uncovered paths:");
    for path in uncovered {
        println!("{path}");
    }
    Ok(())
}

fn version(cli: &Cli) -> Result<()> {
    let rsync = RsyncCommand::new(&cli.rsync_path, Mode::Sync);
    let banner = rsync.version_info()?;
    println!("Rsync Binary Path: {}", cli.rsync_path.display());
    print!("Version Info: {banner}");
    Ok(())
}

/// Maps a failure to the sysexits code the process exits with.
pub(crate) fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::ConfigRead { .. }) => sysexits::EX_NOINPUT,
        Some(Error::ConfigParse(_)) => sysexits::EX_DATAERR,
        Some(e) if e.is_validation() => sysexits::EX_CONFIG,
        Some(Error::InvalidRsyncPath(_) | Error::InvalidRsyncVersion(_) | Error::CommandFailed { .. }) => {
            sysexits::EX_UNAVAILABLE
        }
        _ => sysexits::EX_IOERR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_rsync::validate::PathKind;

    #[test]
    fn test_global_defaults() {
        let cli = Cli::try_parse_from(["backup", "check-coverage"]).unwrap();
        assert_eq!(cli.config, "config.yaml");
        assert_eq!(cli.rsync_path, PathBuf::from("/usr/bin/rsync"));
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
        assert_eq!(cli.log_level, "warn");
        assert!(matches!(cli.commands, Commands::CheckCoverage));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "backup",
            "config",
            "show",
            "--config",
            "/etc/backup.yaml",
            "--rsync-path",
            "/opt/bin/rsync",
        ])
        .unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("/etc/backup.yaml"));
        assert_eq!(cli.rsync_path, PathBuf::from("/opt/bin/rsync"));
        assert!(matches!(
            cli.commands,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["backup"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let missing = anyhow::Error::new(Error::ConfigRead {
            path: PathBuf::from("x.yaml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
        .context("Failed to load configuration 'x.yaml'");
        assert_eq!(exit_code(&missing), sysexits::EX_NOINPUT);

        let overlap = anyhow::Error::new(Error::PathOverlap {
            job: "a".to_string(),
            other: "b".to_string(),
            kind: PathKind::Source,
        });
        assert_eq!(exit_code(&overlap), sysexits::EX_CONFIG);

        let rsync = anyhow::Error::new(Error::InvalidRsyncPath("rsync".to_string()));
        assert_eq!(exit_code(&rsync), sysexits::EX_UNAVAILABLE);

        let io = anyhow::Error::new(std::io::Error::other("disk"));
        assert_eq!(exit_code(&io), sysexits::EX_IOERR);
    }
}
