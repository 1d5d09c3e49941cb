//! Handle to a spawned child and its process group.

use nix::unistd::Pid;
use std::io::{self, Read};
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ChildStdin, ExitStatus};
use tracing::debug;

/// A live (or recently finished) child process started by the executor.
///
/// The child is the leader of its own process group, so the group id equals
/// its pid. Signals for cleanup always go to the group.
pub struct ProcessHandle {
    child: Child,
    pid: u32,
    command: String,
    stdin: Option<ChildStdin>,
    stdout: Option<Box<dyn Read + Send>>,
    stderr: Option<Box<dyn Read + Send>>,
    exit_code: Option<i32>,
}

impl ProcessHandle {
    pub(crate) fn new(
        mut child: Child,
        command: String,
        stdout: Option<Box<dyn Read + Send>>,
    ) -> Self {
        let pid = child.id();
        let stdin = child.stdin.take();
        let stdout = stdout.or_else(|| {
            child
                .stdout
                .take()
                .map(|s| Box::new(s) as Box<dyn Read + Send>)
        });
        let stderr = child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn Read + Send>);

        Self {
            child,
            pid,
            command,
            stdin,
            stdout,
            stderr,
            exit_code: None,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Process group id; the child leads its own group.
    pub fn pgid(&self) -> Pid {
        Pid::from_raw(self.pid as i32)
    }

    /// The assembled shell command this process runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Exit code once the leader has been reaped.
    ///
    /// A process terminated by a signal reports the negated signal number.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Check whether the leader is still running, reaping it if it has exited.
    pub fn is_alive(&mut self) -> bool {
        if self.exit_code.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit_code = Some(exit_code_of(status));
                false
            }
            Ok(None) => true,
            Err(e) => {
                debug!(pid = self.pid, error = %e, "Failed to poll process, treating it as exited");
                false
            }
        }
    }

    pub(crate) fn take_stdout(&mut self) -> Option<Box<dyn Read + Send>> {
        self.stdout.take()
    }

    pub(crate) fn take_stderr(&mut self) -> Option<Box<dyn Read + Send>> {
        self.stderr.take()
    }

    /// Close our end of the child's stdin pipe, if we hold one.
    pub(crate) fn close_stdin(&mut self) {
        self.stdin = None;
    }

    /// Block until the leader exits and return its exit code.
    pub(crate) fn reap(&mut self) -> io::Result<i32> {
        if let Some(code) = self.exit_code {
            return Ok(code);
        }
        let code = exit_code_of(self.child.wait()?);
        self.exit_code = Some(code);
        Ok(code)
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("command", &self.command)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| -status.signal().unwrap_or(0))
}
