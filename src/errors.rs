// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every component surfaces failures through [`DeskError`]; callers match on
//! the variant to tell a timed-out command from one that merely exited with a
//! failure status, or a missing process from a missing binary.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    /// The binary could not be spawned (missing, not executable, ...).
    #[error("failed to start '{command}': {source}")]
    StartFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The deadline elapsed and the child was force-terminated.
    #[error("'{command}' timed out after {}s", whole_secs(.timeout))]
    Timeout { command: String, timeout: Duration },

    /// The child ran and exited with a failure status.
    #[error("'{command}' exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("no '{0}' processes found")]
    NotFound(String),

    #[error("invalid process name: {0:?}")]
    InvalidProcessName(String),

    #[error("dependency '{0}' not found in PATH")]
    DependencyError(String),

    #[error("Environment error: {0}")]
    EnvironmentError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("no handler registered for '{0}'")]
    NoHandlerError(String),

    #[error("health check failed: {0}")]
    HealthCheck(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    /// True when a signal-sending command reported that its target no longer
    /// exists.
    pub fn is_vanished_process(&self) -> bool {
        match self {
            DeskError::NonZeroExit { stderr, .. } => {
                stderr.to_lowercase().contains("no such process")
            }
            _ => false,
        }
    }
}

fn whole_secs(timeout: &Duration) -> u64 {
    timeout.as_secs()
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DeskError>;
