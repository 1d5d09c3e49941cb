//! RunnerConfig struct definition and default implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for process execution.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    // =========================================================================
    // Streaming settings
    // =========================================================================
    /// Number of bytes requested per stdout read while streaming.
    #[serde(default = "default_read_buffer_length")]
    pub read_buffer_length: usize,

    // =========================================================================
    // Timeout and termination settings
    // =========================================================================
    /// Interval between liveness checks while a timeout is in force.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pause after each signal of the kill sequence, so crash handlers can
    /// finish dumping stack traces.
    #[serde(default = "default_kill_grace_ms")]
    pub kill_grace_ms: u64,

    // =========================================================================
    // Environment settings
    // =========================================================================
    /// Variables forced onto every child before caller overrides are applied.
    ///
    /// Defaults to the sanitizer option variables, all set to empty, so options
    /// inherited from a fuzzing environment do not leak into reproduction runs.
    #[serde(default = "default_blocked_env")]
    pub blocked_env: BTreeMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            read_buffer_length: default_read_buffer_length(),
            poll_interval_ms: default_poll_interval_ms(),
            kill_grace_ms: default_kill_grace_ms(),
            blocked_env: default_blocked_env(),
        }
    }
}

impl RunnerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }
}

fn default_read_buffer_length() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_kill_grace_ms() -> u64 {
    3000
}

/// Sanitizer option variables, each mapped to the empty string.
pub fn default_blocked_env() -> BTreeMap<String, String> {
    [
        "ASAN_OPTIONS",
        "CFI_OPTIONS",
        "LSAN_OPTIONS",
        "MSAN_OPTIONS",
        "TSAN_OPTIONS",
        "UBSAN_OPTIONS",
    ]
    .into_iter()
    .map(|name| (name.to_string(), String::new()))
    .collect()
}
