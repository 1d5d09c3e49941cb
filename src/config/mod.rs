//! Runner configuration for crashrepro.
//!
//! This module defines the `RunnerConfig` struct that tunes process execution:
//! read chunk size, timeout polling, kill grace period, and the sanitizer
//! environment variables neutralised for every child. It supports
//! forward-compatible YAML parsing (unknown fields are ignored), defaults for
//! every field, and validation of config values.

mod model;
mod operations;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{RunnerConfig, default_blocked_env};
