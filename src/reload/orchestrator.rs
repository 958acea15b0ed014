// src/reload/orchestrator.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::errors::{DeskError, Result};
use crate::exec::{CommandRunner, ExecutionRequest};
use crate::hyprland::{self, HYPRCTL, STATUS_BAR};
use crate::process::{KILL, PGREP, ProcessControl};
use crate::types::ReloadTarget;

use super::SessionEnv;

/// Delays inserted between reload steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOptions {
    /// Between terminating the bar and starting it again.
    pub kill_wait: Duration,
    /// Before the window-manager reload in `All`, and before the health check
    /// of a bar-only reload.
    pub settle_delay: Duration,
}

impl Default for ReloadOptions {
    fn default() -> Self {
        Self {
            kill_wait: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
        }
    }
}

/// Sequential reload workflow: validate environment, check dependencies,
/// reload, health check. Steps never run in parallel and every step assumes
/// the previous one succeeded.
pub struct ReloadOrchestrator {
    runner: Arc<dyn CommandRunner>,
    processes: Arc<dyn ProcessControl>,
    session: SessionEnv,
    options: ReloadOptions,
}

impl fmt::Debug for ReloadOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadOrchestrator")
            .field("session", &self.session)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ReloadOrchestrator {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        processes: Arc<dyn ProcessControl>,
        session: SessionEnv,
        options: ReloadOptions,
    ) -> Self {
        Self {
            runner,
            processes,
            session,
            options,
        }
    }

    pub async fn reload(&self, target: ReloadTarget) -> Result<()> {
        self.session.validate().inspect_err(|e| {
            error!(error = %e, "environment validation failed");
        })?;

        self.check_dependencies(target).inspect_err(|e| {
            warn!(error = %e, "dependency check failed");
        })?;

        info!(component = %target, "starting reload process");

        match target {
            ReloadTarget::All => self.reload_all().await,
            ReloadTarget::WindowManager => {
                self.reload_window_manager().await?;
                self.health_check(target).await
            }
            ReloadTarget::StatusBar => {
                self.reload_status_bar().await?;
                sleep(self.options.settle_delay).await;
                self.health_check(target).await
            }
        }
    }

    /// Binaries the given target needs on `PATH`.
    pub fn required_binaries(target: ReloadTarget) -> Vec<&'static str> {
        let mut deps = vec![HYPRCTL, PGREP, KILL];
        if target.includes_status_bar() {
            deps.push(STATUS_BAR);
        }
        deps
    }

    fn check_dependencies(&self, target: ReloadTarget) -> Result<()> {
        for dep in Self::required_binaries(target) {
            if !self.processes.binary_exists(dep)? {
                return Err(DeskError::DependencyError(dep.to_string()));
            }
        }
        Ok(())
    }

    async fn reload_all(&self) -> Result<()> {
        info!("reloading all components");

        if let Err(e) = self.reload_status_bar().await {
            warn!(error = %e, "failed to reload status bar; continuing");
        }

        sleep(self.options.settle_delay).await;

        self.reload_window_manager().await.inspect_err(|e| {
            error!(error = %e, "failed to reload window manager");
        })?;

        self.health_check(ReloadTarget::All).await?;

        info!("successfully reloaded all components");
        Ok(())
    }

    async fn reload_window_manager(&self) -> Result<()> {
        info!("reloading Hyprland configuration");
        self.runner.run(hyprland::reload_request()).await?;
        info!("Hyprland configuration reloaded");
        Ok(())
    }

    async fn reload_status_bar(&self) -> Result<()> {
        info!("reloading status bar");

        if self.processes.is_running(STATUS_BAR).await {
            if let Err(e) = self.processes.kill(STATUS_BAR).await {
                warn!(error = %e, "failed to kill status bar process");
            }
            debug!(wait = ?self.options.kill_wait, "waiting for status bar to terminate");
            sleep(self.options.kill_wait).await;
        } else {
            info!("status bar is not running, starting it");
        }

        self.start_status_bar().await
    }

    async fn start_status_bar(&self) -> Result<()> {
        if !self.processes.binary_exists(STATUS_BAR)? {
            return Err(DeskError::DependencyError(STATUS_BAR.to_string()));
        }

        let request = ExecutionRequest::new(STATUS_BAR).detached().discard_output();
        let pid = self.runner.start(request).await.inspect_err(|e| {
            error!(error = %e, "failed to start status bar");
        })?;

        info!(pid, "status bar started");
        Ok(())
    }

    async fn health_check(&self, target: ReloadTarget) -> Result<()> {
        debug!(component = %target, "performing post-reload health check");

        if target.includes_window_manager() {
            if let Err(e) = self.runner.run(hyprland::version_request()).await {
                warn!(error = %e, "Hyprland health check failed");
                return Err(DeskError::HealthCheck(format!("hyprland is not responding: {e}")));
            }
            debug!("Hyprland health check passed");
        }

        if target.includes_status_bar() {
            if !self.processes.is_running(STATUS_BAR).await {
                warn!("status bar is not running after reload");
                return Err(DeskError::HealthCheck(format!(
                    "{STATUS_BAR} is not running after reload"
                )));
            }
            debug!("status bar health check passed");
        }

        Ok(())
    }
}
