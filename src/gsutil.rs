//! gsutil invocation.
//!
//! Testcases and builds are fetched from Cloud Storage with gsutil. A missing
//! gsutil gets its own error so the user is pointed at the Cloud SDK.

use std::path::PathBuf;

use crate::error::{ReproError, Result};
use crate::process::{EnvOverrides, ExecutionResult, Executor, SpawnOptions, WaitOptions};

/// Run `gsutil <args>` in `cwd`.
pub fn gsutil(
    executor: &Executor,
    args: impl Into<String>,
    cwd: impl Into<PathBuf>,
    env: EnvOverrides,
    wait: WaitOptions,
) -> Result<ExecutionResult> {
    let mut spawn = SpawnOptions::new("gsutil", args, cwd);
    spawn.env = env;

    executor.execute(spawn, wait).map_err(|e| match e {
        ReproError::NotInstalled(_) => ReproError::GsutilNotInstalled,
        other => other,
    })
}
