//! JSON summary of a finished run.

use crate::error::{ReproError, Result};
use crate::process::ExecutionResult;
use serde::Serialize;

/// What `run --json` prints.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub command: &'a str,
    pub exit_code: i32,
    pub success: bool,
    pub output: String,
}

impl<'a> RunReport<'a> {
    pub fn new(command: &'a str, result: &ExecutionResult) -> Self {
        Self {
            command,
            exit_code: result.exit_code,
            success: result.is_success(),
            output: result.output_text(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReproError::UserError(format!("failed to serialize run report: {}", e)))
    }
}
