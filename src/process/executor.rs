//! Command execution: spawn, stream, join, kill, classify.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::env::{EnvOverrides, child_env, env_prefix, sanitize_env};
use super::handle::ProcessHandle;
use super::kill::Killer;
use super::stdin::Stdin;
use super::timeout::TimeoutWatcher;
use crate::config::RunnerConfig;
use crate::error::{ReproError, Result};
use crate::memo::MemoCache;
use crate::output::{Hidden, Identity, NullOutputLog, OutputTransformer, RawOutputSink};
use crate::style::{Color, colorize, emphasize};

const SEPARATOR: &str = "---------------------------------------";

const SHELL: &str = "sh";

/// Process group placement for the child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessGroup {
    /// The child leads a new process group, so its descendants can be killed with it.
    #[default]
    New,
    /// The child stays in our group. Group kills then find nothing to signal.
    Inherit,
}

/// Everything needed to start a command.
#[derive(Debug)]
pub struct SpawnOptions {
    pub binary: String,
    pub args: String,
    pub cwd: PathBuf,
    pub env: EnvOverrides,
    pub stdin: Stdin,
    /// Log the command line at info level instead of debug.
    pub print_command: bool,
    pub process_group: ProcessGroup,
    pub redirect_stderr_to_stdout: bool,
}

impl SpawnOptions {
    pub fn new(binary: impl Into<String>, args: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: args.into(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
            stdin: Stdin::default(),
            print_command: true,
            process_group: ProcessGroup::default(),
            redirect_stderr_to_stdout: false,
        }
    }

    /// Set an environment override; `None` leaves the variable alone.
    pub fn env(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.env.insert(key.into(), value);
        self
    }

    pub fn stdin(mut self, stdin: Stdin) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn print_command(mut self, print: bool) -> Self {
        self.print_command = print;
        self
    }

    pub fn process_group(mut self, group: ProcessGroup) -> Self {
        self.process_group = group;
        self
    }

    pub fn redirect_stderr_to_stdout(mut self, redirect: bool) -> Self {
        self.redirect_stderr_to_stdout = redirect;
        self
    }
}

/// How to supervise a started command.
pub struct WaitOptions {
    /// Fail with `CommandFailed` on a non-zero exit code.
    pub exit_on_error: bool,
    /// Collect stdout and stderr into the result.
    pub capture_output: bool,
    /// Show output live through the transformers.
    pub print_output: bool,
    pub timeout: Option<Duration>,
    /// Defaults to [`Hidden`].
    pub stdout_transformer: Option<Box<dyn OutputTransformer>>,
    /// Defaults to [`Identity`].
    pub stderr_transformer: Option<Box<dyn OutputTransformer>>,
    /// Bytes per stdout read; defaults to the runner config.
    pub read_buffer_length: Option<usize>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            exit_on_error: true,
            capture_output: true,
            print_output: true,
            timeout: None,
            stdout_transformer: None,
            stderr_transformer: None,
            read_buffer_length: None,
        }
    }
}

impl WaitOptions {
    pub fn exit_on_error(mut self, exit: bool) -> Self {
        self.exit_on_error = exit;
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    pub fn print_output(mut self, print: bool) -> Self {
        self.print_output = print;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn stdout_transformer(mut self, transformer: Box<dyn OutputTransformer>) -> Self {
        self.stdout_transformer = Some(transformer);
        self
    }

    pub fn stderr_transformer(mut self, transformer: Box<dyn OutputTransformer>) -> Self {
        self.stderr_transformer = Some(transformer);
        self
    }

    pub fn read_buffer_length(mut self, length: usize) -> Self {
        self.read_buffer_length = Some(length);
        self
    }
}

/// Outcome of a command that was allowed to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code; negative when the process was terminated by that signal.
    pub exit_code: i32,
    /// Streamed stdout, then the stdout remainder, then stderr. Empty unless captured.
    pub output: Vec<u8>,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// The combined output as text, with invalid UTF-8 replaced.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// What the join step collected.
struct Drained {
    stdout_rest: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: i32,
}

/// Runs commands with process-group isolation, timeouts, and output streaming.
pub struct Executor {
    config: RunnerConfig,
    killer: Killer,
    watcher: TimeoutWatcher,
    memo: Arc<MemoCache>,
    raw_output: Arc<dyn RawOutputSink>,
}

impl Executor {
    pub fn new(config: RunnerConfig, memo: Arc<MemoCache>) -> Self {
        Self {
            killer: Killer::new(config.kill_grace()),
            watcher: TimeoutWatcher::new(config.poll_interval()),
            config,
            memo,
            raw_output: Arc::new(NullOutputLog),
        }
    }

    /// Replace the kill sequence runner.
    pub fn with_killer(mut self, killer: Killer) -> Self {
        self.killer = killer;
        self
    }

    /// Archive every displayed chunk to `sink`.
    pub fn with_output_log(mut self, sink: Arc<dyn RawOutputSink>) -> Self {
        self.raw_output = sink;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Start a command and wait for it.
    pub fn execute(&self, spawn: SpawnOptions, wait: WaitOptions) -> Result<ExecutionResult> {
        let handle = self.start(spawn)?;
        self.wait(handle, wait)
    }

    /// Find `binary` on the search path, relative to `cwd`.
    ///
    /// `path_var` overrides the inherited `PATH`. Checked on every call; build
    /// directories are deleted and re-downloaded between runs.
    pub fn resolve_binary(&self, binary: &str, cwd: &Path, path_var: Option<&str>) -> Result<PathBuf> {
        which::which_in(binary, Some(search_path(path_var)), cwd)
            .map_err(|_| ReproError::NotInstalled(binary.to_string()))
    }

    /// The shell commands run under, resolved once per search path.
    fn shell(&self, path_var: Option<&str>) -> Result<PathBuf> {
        let search_path = search_path(path_var);

        self.memo
            .get_or_try_insert_with("shell", search_path.clone(), || {
                which::which_in(SHELL, Some(&search_path), Path::new("/"))
                    .map_err(|_| ReproError::NotInstalled(SHELL.to_string()))
            })
    }

    /// Spawn a command in its own process group.
    ///
    /// The binary must resolve on the search path; otherwise `NotInstalled` is
    /// returned and nothing is spawned. The command runs through `sh -c` with
    /// the sanitizer variables blanked and the caller's overrides on top.
    pub fn start(&self, options: SpawnOptions) -> Result<ProcessHandle> {
        let sanitized = sanitize_env(&options.env);
        let resolved = self.resolve_binary(
            &options.binary,
            &options.cwd,
            sanitized.get("PATH").map(String::as_str),
        )?;
        debug!(binary = %options.binary, resolved = %resolved.display(), "Resolved binary");

        let command = format!("{} {}", options.binary, options.args)
            .trim()
            .to_string();

        let line = command_log_line(&options.binary, &options.args, &sanitized, &options.stdin);
        if options.print_command {
            info!("{}", line);
        } else {
            debug!("{}", line);
        }

        let shell = self.shell(sanitized.get("PATH").map(String::as_str))?;

        let mut cmd = Command::new(shell);
        cmd.arg("-c")
            .arg(&command)
            .current_dir(&options.cwd)
            .envs(child_env(&self.config.blocked_env, &sanitized))
            .stdin(options.stdin.stdio()?);

        if options.process_group == ProcessGroup::New {
            cmd.process_group(0);
        }

        let merged = if options.redirect_stderr_to_stdout {
            let (reader, writer) = io::pipe()
                .map_err(|e| ReproError::Io(format!("failed to create output pipe: {}", e)))?;
            let writer_for_stderr = writer
                .try_clone()
                .map_err(|e| ReproError::Io(format!("failed to create output pipe: {}", e)))?;
            cmd.stdout(writer).stderr(writer_for_stderr);
            Some(Box::new(reader) as Box<dyn Read + Send>)
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            None
        };

        let child = cmd.spawn().map_err(|e| {
            ReproError::Io(format!("failed to execute '{}': {}", command, e))
        })?;
        // Drop our copies of the merged pipe's write end, or stdout never reaches EOF.
        drop(cmd);

        debug!(pid = child.id(), command = %command, "Process spawned");
        Ok(ProcessHandle::new(child, command, merged))
    }

    /// Supervise a started command until it finishes and classify the result.
    ///
    /// The timeout is enforced first, then stdout is streamed in chunks, then
    /// the rest of stdout and all of stderr are collected. The process group is
    /// always killed before output is finalised, even after a clean exit.
    pub fn wait(&self, mut handle: ProcessHandle, options: WaitOptions) -> Result<ExecutionResult> {
        let WaitOptions {
            exit_on_error,
            capture_output,
            print_output,
            timeout,
            stdout_transformer,
            stderr_transformer,
            read_buffer_length,
        } = options;

        let mut stdout_transformer = stdout_transformer.unwrap_or_else(|| Box::new(Hidden));
        let mut stderr_transformer =
            stderr_transformer.unwrap_or_else(|| Box::new(Identity::new()));
        let chunk_size = read_buffer_length
            .unwrap_or(self.config.read_buffer_length)
            .max(1);

        debug!("{}", SEPARATOR);
        self.watcher.wait(&mut handle, timeout, &self.killer);

        stdout_transformer.set_output(Box::new(io::stdout()));
        stderr_transformer.set_output(Box::new(io::stderr()));

        let mut output = Vec::new();
        let drained = self.drain(
            &mut handle,
            chunk_size,
            print_output,
            capture_output,
            stdout_transformer.as_mut(),
            &mut output,
        );
        // Runs whatever happened above; descendants may outlive the leader.
        let killed = self.killer.kill(&mut handle);
        let Drained {
            stdout_rest,
            stderr,
            exit_code,
        } = drained?;
        killed?;

        for (transformer, data) in [
            (stdout_transformer.as_mut(), &stdout_rest),
            (stderr_transformer.as_mut(), &stderr),
        ] {
            if capture_output {
                output.extend_from_slice(data);
            }

            if print_output {
                self.raw_output.send_output(data);
                display(&mut *transformer, data);
                if let Err(e) = transformer.flush() {
                    debug!(error = %e, "Failed to flush output");
                }
            }
        }

        debug!("{}", SEPARATOR);
        if exit_code != 0 {
            debug!("| Return code is non-zero ({}).", exit_code);
            if exit_on_error {
                debug!("| Exit.");
                return Err(ReproError::CommandFailed {
                    command: handle.command().to_string(),
                    exit_code,
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                });
            }
        }

        Ok(ExecutionResult { exit_code, output })
    }

    /// Stream stdout to EOF, then join: remaining stdout, all of stderr, exit code.
    ///
    /// stderr is only read here; reading it while stdout is still open could
    /// block on the wrong pipe.
    fn drain(
        &self,
        handle: &mut ProcessHandle,
        chunk_size: usize,
        print_output: bool,
        capture_output: bool,
        transformer: &mut dyn OutputTransformer,
        output: &mut Vec<u8>,
    ) -> Result<Drained> {
        let mut stdout = handle.take_stdout();

        if let Some(stdout) = stdout.as_mut() {
            let mut buf = vec![0u8; chunk_size];
            loop {
                let n = match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(pipe_error(handle, "stdout", e)),
                };
                let chunk = &buf[..n];

                if print_output {
                    self.raw_output.send_output(chunk);
                    display(&mut *transformer, chunk);
                }
                if capture_output {
                    output.extend_from_slice(chunk);
                }
            }
        }

        handle.close_stdin();

        let mut stdout_rest = Vec::new();
        if let Some(mut stdout) = stdout {
            stdout
                .read_to_end(&mut stdout_rest)
                .map_err(|e| pipe_error(handle, "stdout", e))?;
        }

        let mut stderr = Vec::new();
        if let Some(mut pipe) = handle.take_stderr() {
            pipe.read_to_end(&mut stderr)
                .map_err(|e| pipe_error(handle, "stderr", e))?;
        }

        let exit_code = handle.reap().map_err(|e| {
            ReproError::Io(format!(
                "failed to wait for '{}' (pid {}): {}",
                handle.command(),
                handle.pid(),
                e
            ))
        })?;

        Ok(Drained {
            stdout_rest,
            stderr,
            exit_code,
        })
    }
}

/// The human-readable `Running: ...` line for a command.
pub(crate) fn command_log_line(
    binary: &str,
    args: &str,
    sanitized: &BTreeMap<String, String>,
    stdin: &Stdin,
) -> String {
    let body = [env_prefix(sanitized), emphasize(binary), args.to_string()].join(" ");
    colorize(
        &stdin.annotate(format!("Running: {}", body.trim())),
        Color::Blue,
    )
}

fn search_path(path_var: Option<&str>) -> String {
    match path_var {
        Some(path) => path.to_string(),
        None => std::env::var("PATH").unwrap_or_default(),
    }
}

/// Send a chunk to a transformer; display failures never affect the command.
fn display(transformer: &mut dyn OutputTransformer, chunk: &[u8]) {
    if chunk.is_empty() {
        return;
    }
    if let Err(e) = transformer.process(chunk) {
        debug!(error = %e, "Failed to display output chunk");
    }
}

fn pipe_error(handle: &ProcessHandle, stream: &str, e: io::Error) -> ReproError {
    ReproError::Io(format!(
        "failed to read {} of '{}' (pid {}): {}",
        stream,
        handle.command(),
        handle.pid(),
        e
    ))
}
