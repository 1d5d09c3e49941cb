//! Raw output archival.

use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{ReproError, Result};

/// Receives every raw output chunk that is displayed, for later inspection.
///
/// Archival is best-effort: implementations swallow their own write failures
/// so that a full disk never changes the outcome of a command.
pub trait RawOutputSink: Send + Sync {
    fn send_output(&self, chunk: &[u8]);
}

/// Discards all output.
#[derive(Debug, Default)]
pub struct NullOutputLog;

impl RawOutputSink for NullOutputLog {
    fn send_output(&self, _chunk: &[u8]) {}
}

/// Appends raw output to a file.
#[derive(Debug)]
pub struct FileOutputLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileOutputLog {
    /// Open `path` for appending, creating it if needed, and write a session marker.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReproError::Io(format!(
                    "failed to create output log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ReproError::Io(format!(
                    "failed to open output log '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        writeln!(file, "===== {} =====", Utc::now().to_rfc3339()).map_err(|e| {
            ReproError::Io(format!(
                "failed to write to output log '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawOutputSink for FileOutputLog {
    fn send_output(&self, chunk: &[u8]) {
        let mut file = self
            .file
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if let Err(e) = file.write_all(chunk) {
            debug!(path = %self.path.display(), error = %e, "Failed to archive output chunk");
        }
    }
}
