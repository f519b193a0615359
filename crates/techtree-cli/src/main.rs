//! `techtree` binary.
//!
//! Usage:
//!   techtree --game-data ./game-data roles
//!   techtree known import ~/Saves/Autosave.gz
//!   techtree pinned --mode recursive --json

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use techtree_cli::cli::Cli;
use techtree_cli::commands;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let settings = cli.settings();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = commands::run(cli.command, &settings, &mut out).and_then(|()| {
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
