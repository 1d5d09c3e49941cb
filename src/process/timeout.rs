//! Wall-clock budget enforcement for a running process.

use std::time::Duration;
use tracing::debug;

use super::handle::ProcessHandle;
use super::kill::Killer;

/// Polls a process and kills its group once the budget is spent.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutWatcher {
    poll_interval: Duration,
}

impl TimeoutWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait for `handle` to exit, for at most `timeout`.
    ///
    /// `None` (or a zero timeout) returns immediately without touching the
    /// process. Otherwise the process is polled every interval, and on every way
    /// out of the loop the kill sequence runs, whether the process timed out or
    /// had already exited. Kill errors here are logged and dropped.
    pub fn wait(&self, handle: &mut ProcessHandle, timeout: Option<Duration>, killer: &Killer) {
        let Some(timeout) = timeout.filter(|t| !t.is_zero()) else {
            return;
        };

        let interval_ms = self.poll_interval.as_millis().max(1);
        let iterations = timeout.as_millis().div_ceil(interval_ms);

        for _ in 0..iterations {
            std::thread::sleep(self.poll_interval);
            if !handle.is_alive() {
                break;
            }
        }

        if let Err(e) = killer.kill(handle) {
            debug!(pid = handle.pid(), error = %e, "Ignoring kill failure after timeout wait");
        }
    }
}
