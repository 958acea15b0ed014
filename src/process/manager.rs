// src/process/manager.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{DeskError, Result};
use crate::exec::{BoxFuture, CommandRunner, ExecutionRequest};

use super::{KILL, PGREP, PROCESS_NAME_MAX, ProcessControl};

/// Signals used by the termination escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Graceful: lets the process clean up.
    Term,
    /// Forceful: no cleanup opportunity.
    Kill,
}

impl Signal {
    fn flag(self) -> &'static str {
        match self {
            Signal::Term => "-TERM",
            Signal::Kill => "-KILL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Term => f.write_str("TERM"),
            Signal::Kill => f.write_str("KILL"),
        }
    }
}

/// [`ProcessControl`] backed by `pgrep -x` and `kill`, both run through a
/// [`CommandRunner`].
pub struct ProcessManager {
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for ProcessManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessManager").finish_non_exhaustive()
    }
}

impl ProcessManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn find_pids(&self, name: &str) -> Result<Vec<u32>> {
        ensure_name(name)?;
        if name.len() > PROCESS_NAME_MAX {
            warn!(
                name,
                max = PROCESS_NAME_MAX,
                "process name is longer than the kernel keeps; pgrep will not match it"
            );
        }

        let request = ExecutionRequest::new(PGREP).args(["-x", name]);
        match self.runner.run(request).await {
            Ok(output) => Ok(parse_pids(&output)),
            // pgrep: exit status 1 means "no process matched".
            Err(DeskError::NonZeroExit { code: Some(1), .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn running(&self, name: &str) -> bool {
        match self.find_pids(name).await {
            Ok(pids) => !pids.is_empty(),
            Err(e) => {
                debug!(name, error = %e, "process lookup failed; treating as not running");
                false
            }
        }
    }

    async fn signal(&self, pid: u32, signal: Signal) -> Result<()> {
        let request = ExecutionRequest::new(KILL).args([signal.flag().to_string(), pid.to_string()]);
        self.runner.run_combined(request).await.map(|_| ())
    }

    /// TERM, escalating to KILL only when TERM could not be delivered.
    ///
    /// A process that disappeared between lookup and signal counts as
    /// terminated.
    async fn terminate_pid(&self, pid: u32) {
        debug!(pid, "sending TERM");
        let err = match self.signal(pid, Signal::Term).await {
            Ok(()) => return,
            Err(e) if e.is_vanished_process() => {
                debug!(pid, "process exited before TERM was delivered");
                return;
            }
            Err(e) => e,
        };

        warn!(pid, error = %err, "failed to deliver TERM; escalating to KILL");
        match self.signal(pid, Signal::Kill).await {
            Ok(()) => {}
            Err(e) if e.is_vanished_process() => {
                debug!(pid, "process exited before KILL was delivered");
            }
            Err(e) => warn!(pid, error = %e, "failed to deliver KILL"),
        }
    }

    async fn kill_all(&self, name: &str) -> Result<()> {
        debug!(name, "killing process");

        let pids = self.find_pids(name).await?;
        if pids.is_empty() {
            return Err(DeskError::NotFound(name.to_string()));
        }

        for pid in pids {
            self.terminate_pid(pid).await;
        }
        Ok(())
    }
}

impl ProcessControl for ProcessManager {
    fn is_running<'a>(&'a self, name: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(self.running(name))
    }

    fn pids<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u32>>> {
        Box::pin(self.find_pids(name))
    }

    fn kill<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.kill_all(name))
    }

    fn binary_exists(&self, name: &str) -> Result<bool> {
        ensure_name(name)?;
        match which::which(name) {
            Ok(path) => {
                debug!(name, path = %path.display(), "binary found");
                Ok(true)
            }
            Err(e) => {
                debug!(name, error = %e, "binary not found in PATH");
                Ok(false)
            }
        }
    }
}

/// Parse whitespace-separated PIDs as printed by `pgrep`, skipping garbage.
pub fn parse_pids(output: &str) -> Vec<u32> {
    output
        .split_whitespace()
        .filter_map(|token| match token.parse::<u32>() {
            Ok(pid) => Some(pid),
            Err(_) => {
                warn!(token, "ignoring non-numeric pgrep output");
                None
            }
        })
        .collect()
}

fn ensure_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DeskError::InvalidProcessName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pids_reads_one_per_line() {
        assert_eq!(parse_pids("101\n202\n"), vec![101, 202]);
        assert!(parse_pids("").is_empty());
        assert_eq!(parse_pids("7 junk 9"), vec![7, 9]);
    }
}
