//! Command implementations for crashrepro.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and builds the shared executor they run on.

mod gsutil_cmd;
mod run;
mod which;

use crate::cli::{Cli, Command};
use crate::config::RunnerConfig;
use crate::error::{ReproError, Result};
use crate::memo::MemoCache;
use crate::output::FileOutputLog;
use crate::process::{EnvOverrides, Executor};
use std::path::PathBuf;
use std::sync::Arc;

/// Dispatch a command to its implementation.
///
/// `memo` is the process-wide cache built at startup.
pub fn dispatch(cli: Cli, memo: Arc<MemoCache>) -> Result<()> {
    let executor = build_executor(&cli, memo)?;

    match cli.command {
        Command::Run(args) => run::cmd_run(&executor, args),
        Command::Which(args) => which::cmd_which(&executor, args),
        Command::Gsutil(args) => gsutil_cmd::cmd_gsutil(&executor, args),
    }
}

fn build_executor(cli: &Cli, memo: Arc<MemoCache>) -> Result<Executor> {
    let config = RunnerConfig::load_or_default(cli.config.as_deref())?;
    let executor = Executor::new(config, memo);

    match &cli.output_log {
        Some(path) => Ok(executor.with_output_log(Arc::new(FileOutputLog::open(path)?))),
        None => Ok(executor),
    }
}

/// Resolve `--cwd`, defaulting to the current directory.
fn working_dir(cwd: Option<PathBuf>) -> Result<PathBuf> {
    match cwd {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(|e| {
            ReproError::UserError(format!("failed to determine current directory: {}", e))
        }),
    }
}

/// Parse `KEY=VALUE` / `KEY` pairs into environment overrides.
///
/// A bare `KEY` maps to `None`, which drops that override.
fn parse_env(pairs: &[String]) -> Result<EnvOverrides> {
    let mut env = EnvOverrides::new();

    for pair in pairs {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string())),
            None => (pair.as_str(), None),
        };

        if key.is_empty() {
            return Err(ReproError::UserError(format!(
                "invalid --env value '{}': expected KEY=VALUE or KEY",
                pair
            )));
        }

        env.insert(key.to_string(), value);
    }

    Ok(env)
}
