// src/exec/system.rs

//! `tokio::process`-backed command runner.

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

use crate::errors::{DeskError, Result};

use super::runner::{BoxFuture, CommandRunner};
use super::ExecutionRequest;

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    StdoutOnly,
    Combined,
}

/// Real runner used in production.
///
/// - Children never read stdin.
/// - Captured pipes are drained concurrently so a chatty child cannot block on
///   a full pipe.
/// - On timeout the child is killed and reaped before the call returns.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    async fn capture(&self, request: ExecutionRequest, mode: Capture) -> Result<String> {
        let request = request.with_defaults();
        let shown = request.command_line();
        let deadline = Instant::now() + request.timeout();

        let mut cmd = build_command(&request);
        cmd.stdout(piped_unless(request.discard_stdout))
            .stderr(piped_unless(request.discard_stderr))
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| {
            error!(command = %shown, error = %source, "failed to start command");
            DeskError::StartFailure {
                command: shown.clone(),
                source,
            }
        })?;

        let stdout_buf: SharedBuffer = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = match mode {
            Capture::Combined => Arc::clone(&stdout_buf),
            Capture::StdoutOnly => Arc::new(Mutex::new(Vec::new())),
        };

        let mut readers: Vec<JoinHandle<()>> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(drain(stdout, Arc::clone(&stdout_buf))));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(drain(stderr, Arc::clone(&stderr_buf))));
        }

        let status = match timeout_at(deadline, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!(command = %shown, timeout = ?request.timeout(), "command timed out; killing process");
                kill_child(&mut child, &shown).await;
                abort_all(&readers);
                return Err(DeskError::Timeout {
                    command: shown,
                    timeout: request.timeout(),
                });
            }
        };

        // A grandchild may inherit the pipes and keep them open after the
        // direct child is gone.
        let drained = timeout_at(deadline, async {
            for reader in readers.iter_mut() {
                let _ = reader.await;
            }
        })
        .await;
        if drained.is_err() {
            warn!(command = %shown, "output pipes still open at deadline");
            abort_all(&readers);
            return Err(DeskError::Timeout {
                command: shown,
                timeout: request.timeout(),
            });
        }

        let output = buffer_text(&stdout_buf);
        if !status.success() {
            let diagnostics = match mode {
                Capture::Combined => output.trim().to_string(),
                Capture::StdoutOnly => buffer_text(&stderr_buf).trim().to_string(),
            };
            // Callers decide whether a non-zero exit is worth more than debug:
            // `pgrep` exiting 1 is an ordinary "no match".
            debug!(
                command = %shown,
                exit_code = ?status.code(),
                stderr = %diagnostics,
                "command exited with non-zero status"
            );
            return Err(DeskError::NonZeroExit {
                command: shown,
                code: status.code(),
                stderr: diagnostics,
            });
        }

        debug!(command = %shown, output = %output.trim_end(), "command output");
        Ok(output)
    }

    async fn spawn_monitored(&self, request: ExecutionRequest) -> Result<u32> {
        let request = request.with_defaults();
        let shown = request.command_line();

        let mut cmd = build_command(&request);
        cmd.stdout(null_unless_inherited(request.discard_stdout))
            .stderr(null_unless_inherited(request.discard_stderr))
            .kill_on_drop(false);

        let mut child = cmd.spawn().map_err(|source| {
            error!(command = %shown, error = %source, "failed to start command");
            DeskError::StartFailure {
                command: shown.clone(),
                source,
            }
        })?;

        let pid = child.id().ok_or_else(|| DeskError::StartFailure {
            command: shown.clone(),
            source: std::io::Error::other("process exited before its pid was read"),
        })?;

        debug!(command = %shown, pid, detached = request.detach, "command started");

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => log_background_exit(&shown, pid, status),
                Err(e) => error!(command = %shown, pid, error = %e, "waiting for started command failed"),
            }
        });

        Ok(pid)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>> {
        Box::pin(self.capture(request, Capture::StdoutOnly))
    }

    fn run_combined(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>> {
        Box::pin(self.capture(request, Capture::Combined))
    }

    fn start(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<u32>> {
        Box::pin(self.spawn_monitored(request))
    }
}

fn build_command(request: &ExecutionRequest) -> Command {
    debug!(
        command = %request.command,
        args = ?request.args,
        env = ?request.env,
        dir = ?request.dir,
        timeout = ?request.timeout(),
        detach = request.detach,
        "running command"
    );

    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args).stdin(Stdio::null());

    for (key, value) in &request.env {
        cmd.env(key, value);
    }

    if let Some(dir) = &request.dir {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    if request.detach {
        // Group id 0: the child leads a new group named after its own pid.
        cmd.process_group(0);
    }

    cmd
}

fn piped_unless(discard: bool) -> Stdio {
    if discard { Stdio::null() } else { Stdio::piped() }
}

fn null_unless_inherited(discard: bool) -> Stdio {
    if discard { Stdio::null() } else { Stdio::inherit() }
}

async fn drain<R: AsyncRead + Unpin>(mut reader: R, sink: SharedBuffer) {
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if let Ok(mut buf) = sink.lock() {
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
            Err(e) => {
                debug!(error = %e, "stopped reading child output");
                break;
            }
        }
    }
}

fn buffer_text(buffer: &SharedBuffer) -> String {
    match buffer.lock() {
        Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
        Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
    }
}

fn abort_all(readers: &[JoinHandle<()>]) {
    for reader in readers {
        reader.abort();
    }
}

async fn kill_child(child: &mut Child, shown: &str) {
    if let Err(e) = child.kill().await {
        warn!(command = %shown, error = %e, "failed to kill timed-out process");
    }
}

fn log_background_exit(shown: &str, pid: u32, status: ExitStatus) {
    if status.success() {
        debug!(command = %shown, pid, "started command exited successfully");
    } else {
        error!(command = %shown, pid, exit_code = ?status.code(), "started command exited with failure");
    }
}
