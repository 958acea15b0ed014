// src/process/mod.rs

//! Name-based process inspection and termination.
//!
//! Processes are identified by their exact binary name (not a path) and are
//! looked up fresh from the OS process table on every call; no PID list is
//! kept between calls.

pub mod manager;

pub use manager::{ProcessManager, Signal, parse_pids};

use crate::errors::Result;
use crate::exec::BoxFuture;

/// Process utility binaries the manager shells out to.
pub const PGREP: &str = "pgrep";
pub const KILL: &str = "kill";

/// Longest name the kernel keeps for a process (`/proc/PID/comm`). `pgrep -x`
/// compares against that truncated name, so longer names never match.
pub const PROCESS_NAME_MAX: usize = 15;

/// Liveness queries, termination and binary lookup, as seen by the reload
/// workflow. [`ProcessManager`] is the real implementation.
///
/// Names longer than [`PROCESS_NAME_MAX`] bytes are never found: `is_running`
/// reports `false` and `kill` fails with `NotFound`. A warning is logged.
pub trait ProcessControl: Send + Sync {
    /// True iff at least one process named exactly `name` is alive.
    /// "Not found" is a normal `false`, never an error.
    fn is_running<'a>(&'a self, name: &'a str) -> BoxFuture<'a, bool>;

    /// Current PIDs of processes named exactly `name` (possibly empty).
    fn pids<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u32>>>;

    /// Graceful-then-forceful termination of every matching PID.
    ///
    /// Fails with `NotFound` when nothing matches. Per-PID delivery problems
    /// are logged, not returned.
    fn kill<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Whether an executable called `name` is reachable via `PATH`.
    fn binary_exists(&self, name: &str) -> Result<bool>;
}
