//! Subprocess execution with timeouts and process-group cleanup.
//!
//! A command goes through a fixed sequence of states:
//!
//! ```text
//! Spawned -> Streaming -> Joining -> Killed -> Classified
//! ```
//!
//! - **Spawned**: [`Executor::start`] resolves the binary, builds the child
//!   environment and starts the command in a new process group
//! - **Streaming**: [`Executor::wait`] enforces the timeout, then reads stdout
//!   chunk by chunk, forwarding it to the display and the capture buffer
//! - **Joining**: what is left of stdout and all of stderr are collected and
//!   the leader is reaped
//! - **Killed**: the whole process group gets the [`KILL_SIGNALS`] sequence,
//!   even when the leader already exited, because descendants can outlive it
//! - **Classified**: non-zero exit codes become `CommandFailed` on request

mod env;
mod executor;
mod handle;
mod kill;
mod stdin;
mod timeout;


pub use env::EnvOverrides;
pub use executor::{ExecutionResult, Executor, ProcessGroup, SpawnOptions, WaitOptions};
pub use handle::ProcessHandle;
pub use kill::{KILL_SIGNALS, Killer, OsSignals, SignalSender};
pub use stdin::{LiteralInput, Stdin};
pub use timeout::TimeoutWatcher;
