//! Implementation of the `crashrepro run` command.
//!
//! Builds spawn and wait options from the CLI flags, runs the command through
//! the shared executor, and reports the outcome.

mod report;


use super::{parse_env, working_dir};
use crate::cli::RunArgs;
use crate::error::Result;
use crate::output::{Identity, Ninja, OutputTransformer};
use crate::process::{Executor, SpawnOptions, Stdin, WaitOptions};
use report::RunReport;
use std::time::Duration;
use tracing::warn;

/// Execute the `run` command.
pub fn cmd_run(executor: &Executor, args: RunArgs) -> Result<()> {
    let result = executor.execute(spawn_options(&args)?, wait_options(&args))?;

    if !result.is_success() {
        warn!(
            "Command exited with code {} (ignored because of --allow-failure)",
            result.exit_code
        );
    }

    if args.json {
        let command = args.command_string();
        println!("{}", RunReport::new(&command, &result).to_json()?);
    }

    Ok(())
}

fn spawn_options(args: &RunArgs) -> Result<SpawnOptions> {
    let cwd = working_dir(args.cwd.clone())?;

    let stdin = match (&args.stdin, args.no_stdin) {
        (Some(text), _) => Stdin::literal(text)?,
        (None, true) => Stdin::Blocking,
        (None, false) => Stdin::Interactive,
    };

    let mut spawn = SpawnOptions::new(&args.binary, shell_words::join(&args.args), cwd)
        .stdin(stdin)
        .print_command(!args.hide_command)
        .redirect_stderr_to_stdout(args.merge_stderr);
    spawn.env = parse_env(&args.env)?;

    Ok(spawn)
}

fn wait_options(args: &RunArgs) -> WaitOptions {
    let mut wait = WaitOptions::default()
        .exit_on_error(!args.allow_failure)
        .capture_output(!args.no_capture)
        .print_output(!args.quiet)
        .timeout(args.timeout.map(Duration::from_secs));

    if args.show_stdout {
        let transformer: Box<dyn OutputTransformer> = if args.ninja {
            Box::new(Ninja::new())
        } else {
            Box::new(Identity::new())
        };
        wait = wait.stdout_transformer(transformer);
    }

    if let Some(size) = args.chunk_size {
        wait = wait.read_buffer_length(size);
    }

    wait
}

impl RunArgs {
    /// The command string as the executor assembles it, for reporting.
    fn command_string(&self) -> String {
        format!("{} {}", self.binary, shell_words::join(&self.args))
            .trim()
            .to_string()
    }
}
