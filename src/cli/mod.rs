//! CLI argument parsing for crashrepro.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// crashrepro: run and supervise the commands that reproduce crash testcases.
///
/// Every command runs in its own process group with sanitizer options blanked,
/// is killed group-wide when it finishes or times out, and has its output
/// streamed live and captured for reporting.
#[derive(Parser, Debug)]
#[command(name = "crashrepro")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Runner config YAML (chunk size, poll interval, kill grace, blocked env).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output, including every command line and signal.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append the raw output of every command to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub output_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for crashrepro.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command with timeout, output streaming and group cleanup.
    Run(RunArgs),

    /// Show where a binary resolves on the search path.
    Which(WhichArgs),

    /// Run gsutil with the same supervision as `run`.
    Gsutil(GsutilArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Binary to run; must be on PATH (or a path relative to --cwd).
    pub binary: String,

    /// Arguments passed to the binary.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Working directory (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Kill the command after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Environment override; `KEY` alone drops a previous override.
    #[arg(short, long = "env", value_name = "KEY[=VALUE]")]
    pub env: Vec<String>,

    /// Feed this text to the command's stdin.
    #[arg(long, value_name = "TEXT", conflicts_with = "no_stdin")]
    pub stdin: Option<String>,

    /// Give the command an empty stdin pipe instead of the terminal.
    #[arg(long)]
    pub no_stdin: bool,

    /// Send stderr into the stdout pipe.
    #[arg(long)]
    pub merge_stderr: bool,

    /// Do not collect output into the result.
    #[arg(long)]
    pub no_capture: bool,

    /// Do not show output while the command runs.
    #[arg(short, long)]
    pub quiet: bool,

    /// Show stdout while the command runs (hidden by default).
    #[arg(long)]
    pub show_stdout: bool,

    /// Collapse ninja-style `[n/m]` progress lines when showing stdout.
    #[arg(long, requires = "show_stdout")]
    pub ninja: bool,

    /// Report a non-zero exit code instead of failing.
    #[arg(long)]
    pub allow_failure: bool,

    /// Bytes per stdout read.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Log the command line at debug level only.
    #[arg(long)]
    pub hide_command: bool,

    /// Print a JSON summary (command, exit code, output) when done.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `which` command.
#[derive(Parser, Debug)]
pub struct WhichArgs {
    /// Binary name or relative path.
    pub binary: String,

    /// Directory relative paths are resolved against.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the `gsutil` command.
#[derive(Parser, Debug)]
pub struct GsutilArgs {
    /// Arguments passed to gsutil.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Working directory (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Kill gsutil after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_minimal() {
        let cli = Cli::try_parse_from(["crashrepro", "run", "echo"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.binary, "echo");
            assert!(args.args.is_empty());
            assert!(args.timeout.is_none());
            assert!(!args.quiet);
            assert!(!args.allow_failure);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_passes_hyphenated_args_through() {
        let cli = Cli::try_parse_from([
            "crashrepro",
            "run",
            "--timeout",
            "30",
            "--env",
            "ASAN_OPTIONS=symbolize=1",
            "d8",
            "--random-seed=1",
            "-e",
            "print(1)",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.binary, "d8");
            assert_eq!(args.args, vec!["--random-seed=1", "-e", "print(1)"]);
            assert_eq!(args.timeout, Some(30));
            assert_eq!(args.env, vec!["ASAN_OPTIONS=symbolize=1"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crashrepro",
            "run",
            "--verbose",
            "--config",
            "runner.yaml",
            "true",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("runner.yaml")));
    }

    #[test]
    fn stdin_conflicts_with_no_stdin() {
        let result =
            Cli::try_parse_from(["crashrepro", "run", "--stdin", "abc", "--no-stdin", "cat"]);
        assert!(result.is_err());
    }

    #[test]
    fn ninja_requires_show_stdout() {
        assert!(Cli::try_parse_from(["crashrepro", "run", "--ninja", "ninja"]).is_err());
        assert!(
            Cli::try_parse_from(["crashrepro", "run", "--show-stdout", "--ninja", "ninja"]).is_ok()
        );
    }

    #[test]
    fn parse_which() {
        let cli = Cli::try_parse_from(["crashrepro", "which", "gclient"]).unwrap();
        if let Command::Which(args) = cli.command {
            assert_eq!(args.binary, "gclient");
            assert!(args.cwd.is_none());
        } else {
            panic!("Expected Which command");
        }
    }

    #[test]
    fn parse_gsutil() {
        let cli =
            Cli::try_parse_from(["crashrepro", "gsutil", "cp", "gs://b/t", "-r", "."]).unwrap();
        if let Command::Gsutil(args) = cli.command {
            assert_eq!(args.args, vec!["cp", "gs://b/t", "-r", "."]);
        } else {
            panic!("Expected Gsutil command");
        }
    }
}
