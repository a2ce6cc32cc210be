//! `notenest` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and configure logging.
//! - Own the database connection for the lifetime of one command.
//! - Map command status and errors to process exit codes.

mod cli;
mod commands;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::Cli;
use log::debug;
use notenest_core::{
    close_db, default_log_level, flush_logging, init_logging, open_db_with_policy, LogTarget,
    SchemaPolicy,
};
use std::io;
use std::process::ExitCode;

const STDERR_DEFAULT_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);
    flush_logging();

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    configure_logging(&cli)?;

    let policy = if cli.migrate {
        SchemaPolicy::Migrate
    } else {
        SchemaPolicy::Reset
    };
    let conn = open_db_with_policy(&cli.db, policy)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    debug!(
        "event=command_start module=cli status=start command={}",
        cli.command.name()
    );
    let status = commands::execute(
        &conn,
        &cli.db,
        cli.command,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    close_db(conn).context("failed to close database")?;
    Ok(status?.exit_code())
}

fn configure_logging(cli: &Cli) -> Result<()> {
    let (level, target) = match cli.log_dir.as_deref() {
        Some(dir) => (
            cli.log_level.as_deref().unwrap_or(default_log_level()),
            LogTarget::dir(dir).map_err(|err| anyhow!(err))?,
        ),
        None => (
            cli.log_level.as_deref().unwrap_or(STDERR_DEFAULT_LOG_LEVEL),
            LogTarget::Stderr,
        ),
    };

    init_logging(level, target).map_err(|err| anyhow!(err))
}
