//! Implementation of the `crashrepro which` command.

use super::working_dir;
use crate::cli::WhichArgs;
use crate::error::Result;
use crate::process::Executor;

/// Print the resolved path of a binary, or fail with `NotInstalled`.
pub fn cmd_which(executor: &Executor, args: WhichArgs) -> Result<()> {
    let cwd = working_dir(args.cwd)?;
    let path = executor.resolve_binary(&args.binary, &cwd, None)?;
    println!("{}", path.display());
    Ok(())
}
