// src/exec/runner.rs

//! Pluggable command runner abstraction.
//!
//! Everything that launches an external program goes through a
//! [`CommandRunner`] instead of `tokio::process` directly. Production code uses
//! [`super::SystemRunner`]; tests hand in a spying fake that records requests
//! and returns scripted replies without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::ExecutionRequest;

/// Boxed future returned by the object-safe traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait CommandRunner: Send + Sync {
    /// Run to completion within the request timeout and return stdout.
    ///
    /// Fails with `StartFailure`, `NonZeroExit` or `Timeout`.
    fn run(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>>;

    /// Like [`CommandRunner::run`] but stdout and stderr are captured into one
    /// stream in arrival order.
    fn run_combined(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>>;

    /// Launch without waiting and return the child's PID.
    ///
    /// The exit status is only observed (and logged) in the background; the
    /// caller never gets it.
    fn start(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<u32>>;
}
