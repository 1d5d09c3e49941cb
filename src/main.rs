//! crashrepro: process execution runtime for reproducing crash testcases.
//!
//! This is the main entry point for the `crashrepro` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and handles
//! errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod gsutil;
pub mod memo;
pub mod output;
pub mod process;
pub mod style;

use cli::Cli;
use memo::MemoCache;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let memo = Arc::new(MemoCache::new());

    match commands::dispatch(cli, memo) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose {
        EnvFilter::new("crashrepro=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
