//! Tests for config functionality.

use crate::config::{RunnerConfig, default_blocked_env};
use crate::error::ReproError;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = RunnerConfig::default();

    assert_eq!(config.read_buffer_length, 10);
    assert_eq!(config.poll_interval(), Duration::from_millis(500));
    assert_eq!(config.kill_grace(), Duration::from_secs(3));
    assert_eq!(config.blocked_env.len(), 6);
    assert_eq!(config.blocked_env.get("ASAN_OPTIONS"), Some(&String::new()));
    assert_eq!(config.blocked_env.get("UBSAN_OPTIONS"), Some(&String::new()));
}

#[test]
fn test_parse_empty_yaml() {
    let config = RunnerConfig::from_yaml("").unwrap();
    assert_eq!(config, RunnerConfig::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
read_buffer_length: 4096
kill_grace_ms: 100
"#;
    let config = RunnerConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.read_buffer_length, 4096);
    assert_eq!(config.kill_grace_ms, 100);

    // Unspecified values should use defaults
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.blocked_env, default_blocked_env());
}

#[test]
fn test_parse_ignores_unknown_fields() {
    let yaml = r#"
poll_interval_ms: 250
future_setting: true
"#;
    let config = RunnerConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.poll_interval_ms, 250);
}

#[test]
fn test_blocked_env_can_be_replaced() {
    let yaml = r#"
blocked_env:
  ASAN_OPTIONS: "detect_leaks=0"
"#;
    let config = RunnerConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.blocked_env.len(), 1);
    assert_eq!(
        config.blocked_env.get("ASAN_OPTIONS").map(String::as_str),
        Some("detect_leaks=0")
    );
}

#[test]
fn test_zero_read_buffer_rejected() {
    let err = RunnerConfig::from_yaml("read_buffer_length: 0").unwrap_err();
    assert!(matches!(err, ReproError::UserError(_)));
    assert!(err.to_string().contains("read_buffer_length"));
}

#[test]
fn test_zero_poll_interval_rejected() {
    let err = RunnerConfig::from_yaml("poll_interval_ms: 0").unwrap_err();
    assert!(err.to_string().contains("poll_interval_ms"));
}

#[test]
fn test_invalid_env_name_rejected() {
    let yaml = r#"
blocked_env:
  "BAD=NAME": ""
"#;
    let err = RunnerConfig::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("BAD=NAME"));
}

#[test]
fn test_malformed_yaml_is_user_error() {
    let err = RunnerConfig::from_yaml("read_buffer_length: [").unwrap_err();
    assert!(matches!(err, ReproError::UserError(_)));
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_yaml_round_trip() {
    let mut config = RunnerConfig::default();
    config.kill_grace_ms = 10;
    let yaml = config.to_yaml().unwrap();
    assert_eq!(RunnerConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("runner.yaml");
    std::fs::write(&path, "read_buffer_length: 64\n").unwrap();

    let config = RunnerConfig::load(&path).unwrap();
    assert_eq!(config.read_buffer_length, 64);
}

#[test]
fn test_load_missing_file_is_user_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");

    let err = RunnerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ReproError::UserError(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_load_or_default_without_path() {
    let config = RunnerConfig::load_or_default(None).unwrap();
    assert_eq!(config, RunnerConfig::default());
}
