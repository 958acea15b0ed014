use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use hyprdesk::errors::{DeskError, Result};
use hyprdesk::exec::{BoxFuture, CommandRunner, ExecutionRequest};

use crate::fake_processes::FakeProcesses;

/// Scripted outcome of one runner call.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Success with this stdout (or combined output).
    Output(String),
    /// Ran and exited with `code`; `stderr` becomes the diagnostic text.
    Fail { code: i32, stderr: String },
    /// The binary could not be spawned.
    NotInstalled,
    /// The deadline elapsed.
    Timeout,
}

impl Reply {
    pub fn output(s: impl Into<String>) -> Self {
        Reply::Output(s.into())
    }

    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Reply::Fail {
            code,
            stderr: stderr.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Run,
    RunCombined,
    Start,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub request: ExecutionRequest,
}

#[derive(Debug, Default)]
struct Script {
    /// Consumed front to back before falling back to `sticky`.
    once: HashMap<String, VecDeque<Reply>>,
    sticky: HashMap<String, Reply>,
}

impl Script {
    /// Full command line first, then the program name.
    fn reply_for(&mut self, request: &ExecutionRequest) -> Option<Reply> {
        let keys = [request.command_line(), request.command.clone()];
        for key in &keys {
            if let Some(reply) = self.once.get_mut(key).and_then(VecDeque::pop_front) {
                return Some(reply);
            }
        }
        keys.iter().find_map(|key| self.sticky.get(key).cloned())
    }
}

/// Spying [`CommandRunner`] that never touches the OS.
///
/// Unscripted calls succeed with empty output. Replies are matched on the full
/// command line (`"kill -TERM 42"`) before the program name (`"kill"`).
#[derive(Debug)]
pub struct FakeRunner {
    calls: Mutex<Vec<Call>>,
    script: Mutex<Script>,
    next_pid: AtomicU32,
    processes: Option<Arc<FakeProcesses>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(Script::default()),
            next_pid: AtomicU32::new(4000),
            processes: None,
        }
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A successful `start` marks the started program as running in
    /// `processes`.
    pub fn with_processes(processes: Arc<FakeProcesses>) -> Self {
        Self {
            processes: Some(processes),
            ..Self::default()
        }
    }

    /// Reply used for every matching call.
    pub fn on(&self, key: impl Into<String>, reply: Reply) -> &Self {
        lock(&self.script).sticky.insert(key.into(), reply);
        self
    }

    /// Reply used for the next matching call only.
    pub fn once(&self, key: impl Into<String>, reply: Reply) -> &Self {
        lock(&self.script)
            .once
            .entry(key.into())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .map(|call| call.request.command_line())
            .collect()
    }

    /// Command lines passed to `start`.
    pub fn started(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method == Method::Start)
            .map(|call| call.request.command_line())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, method: Method, request: &ExecutionRequest) -> Option<Reply> {
        lock(&self.calls).push(Call {
            method,
            request: request.clone(),
        });
        lock(&self.script).reply_for(request)
    }

    fn captured(&self, method: Method, request: ExecutionRequest) -> Result<String> {
        let command = request.command_line();
        match self.record(method, &request) {
            None => Ok(String::new()),
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::Fail { code, stderr }) => Err(DeskError::NonZeroExit {
                command,
                code: Some(code),
                stderr,
            }),
            Some(Reply::NotInstalled) => Err(not_installed(command)),
            Some(Reply::Timeout) => Err(DeskError::Timeout {
                command,
                timeout: request.timeout(),
            }),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>> {
        let result = self.captured(Method::Run, request);
        Box::pin(async move { result })
    }

    fn run_combined(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<String>> {
        let result = self.captured(Method::RunCombined, request);
        Box::pin(async move { result })
    }

    fn start(&self, request: ExecutionRequest) -> BoxFuture<'_, Result<u32>> {
        let command = request.command_line();
        let result = match self.record(Method::Start, &request) {
            None | Some(Reply::Output(_)) => {
                if let Some(processes) = &self.processes {
                    processes.set_running(&request.command);
                }
                Ok(self.next_pid.fetch_add(1, Ordering::SeqCst))
            }
            Some(Reply::Timeout) => Err(DeskError::Timeout {
                command,
                timeout: request.timeout(),
            }),
            Some(Reply::Fail { .. } | Reply::NotInstalled) => Err(not_installed(command)),
        };
        Box::pin(async move { result })
    }
}

fn not_installed(command: String) -> DeskError {
    DeskError::StartFailure {
        command,
        source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
