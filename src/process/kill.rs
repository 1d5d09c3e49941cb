//! Multi-stage process group termination.

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::time::Duration;
use tracing::debug;

use super::handle::ProcessHandle;
use crate::error::{ReproError, Result};

/// Signals sent to a process group, in order.
///
/// Sanitized binaries can take a while to dump a stack trace on SIGTERM and may
/// leave descendants behind, so a single signal is not enough.
pub const KILL_SIGNALS: [Signal; 4] = [
    Signal::SIGTERM,
    Signal::SIGTERM,
    Signal::SIGKILL,
    Signal::SIGKILL,
];

/// Delivers a signal to every process in a group.
pub trait SignalSender: Send + Sync {
    fn signal_group(&self, pgid: Pid, signal: Signal) -> nix::Result<()>;
}

/// Sends real signals with `killpg(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignals;

impl SignalSender for OsSignals {
    fn signal_group(&self, pgid: Pid, signal: Signal) -> nix::Result<()> {
        killpg(pgid, signal)
    }
}

/// Runs the kill sequence against a process group.
pub struct Killer {
    grace: Duration,
    signals: Box<dyn SignalSender>,
}

impl Killer {
    pub fn new(grace: Duration) -> Self {
        Self::with_sender(grace, Box::new(OsSignals))
    }

    pub fn with_sender(grace: Duration, signals: Box<dyn SignalSender>) -> Self {
        Self { grace, signals }
    }

    /// Kill the process group of `handle`.
    ///
    /// Sends each of [`KILL_SIGNALS`] to the group, pausing for the grace period
    /// after each one. A group that no longer exists (ESRCH) counts as killed,
    /// so calling this on a dead process succeeds. If every signal was delivered
    /// the group is still there and `KillProcessFailed` is returned.
    pub fn kill(&self, handle: &mut ProcessHandle) -> Result<()> {
        for signal in KILL_SIGNALS {
            debug!(pid = handle.pid(), signal = %signal, "Killing process group");

            match self.signals.signal_group(handle.pgid(), signal) {
                Ok(()) => {}
                Err(Errno::ESRCH) => return Ok(()),
                Err(e) => {
                    return Err(ReproError::Io(format!(
                        "failed to send {} to process group {}: {}",
                        signal,
                        handle.pid(),
                        e
                    )));
                }
            }

            std::thread::sleep(self.grace);

            // Reap an exited leader so it does not keep the group alive as a zombie.
            handle.is_alive();
        }

        Err(ReproError::KillProcessFailed {
            command: handle.command().to_string(),
            pid: handle.pid(),
        })
    }
}

impl std::fmt::Debug for Killer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Killer").field("grace", &self.grace).finish()
    }
}
