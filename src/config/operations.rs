//! Config loading and validation.

use super::model::RunnerConfig;
use crate::error::{ReproError, Result};
use std::path::Path;

impl RunnerConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(RunnerConfig)` - Successfully loaded and validated config
    /// * `Err(ReproError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReproError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if one was given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RunnerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ReproError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ReproError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `read_buffer_length` must be positive
    /// - `poll_interval_ms` must be positive
    /// - `blocked_env` names must be non-empty and contain no '=' or NUL
    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_length == 0 {
            return Err(ReproError::UserError(
                "config validation failed: read_buffer_length must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ReproError::UserError(
                "config validation failed: poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        for name in self.blocked_env.keys() {
            if name.is_empty() || name.contains('=') || name.contains('\0') {
                return Err(ReproError::UserError(format!(
                    "config validation failed: blocked_env contains invalid variable name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }
}
