//! Implementation of the `crashrepro gsutil` command.

use super::working_dir;
use crate::cli::GsutilArgs;
use crate::error::Result;
use crate::gsutil::gsutil;
use crate::output::Identity;
use crate::process::{EnvOverrides, Executor, WaitOptions};
use std::time::Duration;

/// Run gsutil with its stdout shown, since it reports transfer progress there.
pub fn cmd_gsutil(executor: &Executor, args: GsutilArgs) -> Result<()> {
    let cwd = working_dir(args.cwd)?;

    let wait = WaitOptions::default()
        .capture_output(false)
        .timeout(args.timeout.map(Duration::from_secs))
        .stdout_transformer(Box::new(Identity::new()));

    gsutil(
        executor,
        shell_words::join(&args.args),
        cwd,
        EnvOverrides::new(),
        wait,
    )?;
    Ok(())
}
