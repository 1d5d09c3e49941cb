//! Error types for crashrepro.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for crashrepro operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum ReproError {
    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// Reading from or writing to a pipe, file, or terminal failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The binary could not be resolved on the search path.
    #[error("{0} is not installed. Please install it and make sure it is on PATH.")]
    NotInstalled(String),

    /// gsutil specifically is missing; it needs its own install guidance.
    #[error(
        "gsutil is not installed. Please install the Google Cloud SDK \
         (https://cloud.google.com/sdk/docs/install) and run `gcloud init`."
    )]
    GsutilNotInstalled,

    /// The command exited with a non-zero code and the caller asked to fail on it.
    #[error("command '{command}' failed with exit code {exit_code}.\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Every signal of the kill sequence was delivered and the group still exists.
    #[error("failed to kill process '{command}' (pid {pid}) after repeated SIGTERM/SIGKILL")]
    KillProcessFailed { command: String, pid: u32 },
}

impl ReproError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReproError::UserError(_) => exit_codes::USER_ERROR,
            ReproError::Io(_) => exit_codes::USER_ERROR,
            ReproError::NotInstalled(_) => exit_codes::NOT_INSTALLED,
            ReproError::GsutilNotInstalled => exit_codes::NOT_INSTALLED,
            ReproError::CommandFailed { .. } => exit_codes::COMMAND_FAILURE,
            ReproError::KillProcessFailed { .. } => exit_codes::KILL_FAILURE,
        }
    }
}

/// Result type alias for crashrepro operations.
pub type Result<T> = std::result::Result<T, ReproError>;
