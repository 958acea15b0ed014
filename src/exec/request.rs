// src/exec/request.rs

//! Description of a single external command invocation.

use std::path::PathBuf;
use std::time::Duration;

/// Timeout applied when a request leaves it unset (0).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Everything needed to launch one external command.
///
/// Built fluently and then treated as a value: the runner calls
/// [`ExecutionRequest::with_defaults`] before using it, so a zero timeout never
/// reaches the process layer.
///
/// ```
/// use hyprdesk::exec::ExecutionRequest;
///
/// let req = ExecutionRequest::new("hyprctl").arg("reload").timeout_secs(5);
/// assert_eq!(req.command_line(), "hyprctl reload");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionRequest {
    pub command: String,
    pub args: Vec<String>,
    /// Overrides layered on top of the inherited environment.
    pub env: Vec<(String, String)>,
    pub dir: Option<PathBuf>,
    /// Seconds; 0 means "use [`DEFAULT_TIMEOUT_SECS`]".
    pub timeout_secs: u64,
    /// Place the child in its own process group.
    pub detach: bool,
    pub discard_stdout: bool,
    pub discard_stderr: bool,
}

impl ExecutionRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn detached(mut self) -> Self {
        self.detach = true;
        self
    }

    pub fn discard_output(mut self) -> Self {
        self.discard_stdout = true;
        self.discard_stderr = true;
        self
    }

    pub fn discard_stdout(mut self) -> Self {
        self.discard_stdout = true;
        self
    }

    pub fn discard_stderr(mut self) -> Self {
        self.discard_stderr = true;
        self
    }

    /// Normalise unset fields. Idempotent.
    pub fn fill_defaults(&mut self) {
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
    }

    /// Consuming variant of [`ExecutionRequest::fill_defaults`].
    pub fn with_defaults(mut self) -> Self {
        self.fill_defaults();
        self
    }

    /// Effective deadline for this request.
    pub fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        };
        Duration::from_secs(secs)
    }

    /// `command arg1 arg2 ...`, used for logs, errors and test assertions.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            return self.command.clone();
        }
        format!("{} {}", self.command, self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_filled_with_default() {
        let req = ExecutionRequest::new("true").with_defaults();
        assert_eq!(req.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(req.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn explicit_timeout_survives_default_fill() {
        let req = ExecutionRequest::new("true").timeout_secs(3).with_defaults();
        assert_eq!(req.timeout_secs, 3);
    }

    #[test]
    fn command_line_joins_args() {
        let req = ExecutionRequest::new("kill").args(["-TERM", "42"]);
        assert_eq!(req.command_line(), "kill -TERM 42");
        assert_eq!(ExecutionRequest::new("waybar").command_line(), "waybar");
    }
}
