use std::collections::BTreeSet;
use std::sync::Mutex;

use hyprdesk::errors::{DeskError, Result};
use hyprdesk::exec::BoxFuture;
use hyprdesk::process::ProcessControl;

use crate::fake_runner::lock;

#[derive(Debug, Default)]
struct State {
    running: BTreeSet<String>,
    missing_binaries: BTreeSet<String>,
    failing_kills: BTreeSet<String>,
    killed: Vec<String>,
}

/// In-memory [`ProcessControl`].
///
/// Every binary exists unless marked missing. `kill` removes a running name
/// and records it; a name marked with [`FakeProcesses::fail_kill`] stays
/// running and the call fails.
#[derive(Debug, Default)]
pub struct FakeProcesses {
    state: Mutex<State>,
}

impl FakeProcesses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_running(&self, name: &str) -> &Self {
        lock(&self.state).running.insert(name.to_string());
        self
    }

    pub fn set_stopped(&self, name: &str) -> &Self {
        lock(&self.state).running.remove(name);
        self
    }

    pub fn missing_binary(&self, name: &str) -> &Self {
        lock(&self.state).missing_binaries.insert(name.to_string());
        self
    }

    pub fn fail_kill(&self, name: &str) -> &Self {
        lock(&self.state).failing_kills.insert(name.to_string());
        self
    }

    pub fn running(&self, name: &str) -> bool {
        lock(&self.state).running.contains(name)
    }

    /// Names successfully killed, in call order.
    pub fn killed(&self) -> Vec<String> {
        lock(&self.state).killed.clone()
    }
}

impl ProcessControl for FakeProcesses {
    fn is_running<'a>(&'a self, name: &'a str) -> BoxFuture<'a, bool> {
        let running = self.running(name);
        Box::pin(async move { running })
    }

    fn pids<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u32>>> {
        let pids = if self.running(name) { vec![1000] } else { Vec::new() };
        Box::pin(async move { Ok(pids) })
    }

    fn kill<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>> {
        let result = {
            let mut state = lock(&self.state);
            if !state.running.contains(name) {
                Err(DeskError::NotFound(name.to_string()))
            } else if state.failing_kills.contains(name) {
                Err(DeskError::NonZeroExit {
                    command: format!("kill -TERM {name}"),
                    code: Some(1),
                    stderr: "Operation not permitted".to_string(),
                })
            } else {
                state.running.remove(name);
                state.killed.push(name.to_string());
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn binary_exists(&self, name: &str) -> Result<bool> {
        if name.trim().is_empty() {
            return Err(DeskError::InvalidProcessName(name.to_string()));
        }
        Ok(!lock(&self.state).missing_binaries.contains(name))
    }
}
