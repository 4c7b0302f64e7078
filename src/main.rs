mod commands;

use crate::commands::Cli;
use anyhow::Result;
use clap::Parser;
use std::process;

/// Entry point for the backup CLI application.
/// Parses command-line arguments, sets up logging and dispatches to the
/// appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .format_timestamp(None)
        .try_init()?;

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {e:#}");
        process::exit(commands::exit_code(&e));
    }
    Ok(())
}
