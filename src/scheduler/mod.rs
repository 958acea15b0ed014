// src/scheduler/mod.rs

//! Periodic job scheduler.
//!
//! Every job gets its own timer task. A tick never runs the action inline:
//! the action is spawned onto its own task, so a slow job cannot delay the
//! next tick of any timer (its own included) and a panicking job only takes
//! down its own task. Overlapping runs of the same job are allowed.

pub mod handlers;
pub mod job;
pub mod registry;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::errors::{DeskError, Result};
use crate::exec::{BoxFuture, CommandRunner, ExecutionRequest};
use crate::types::JobKind;

pub use handlers::{HandlerContext, register_builtins};
pub use job::{ArgValue, Job, JobArgs};
pub use registry::{HandlerFactory, HandlerRegistry, JobAction};

/// Jobs bound to their actions, ready to be started.
pub struct Scheduler {
    entries: Vec<(Job, JobAction)>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("jobs", &self.job_names().collect::<Vec<_>>())
            .finish()
    }
}

impl Scheduler {
    /// Bind every job to its action.
    ///
    /// Fails with `ConfigError` when there is nothing to schedule or a job has
    /// a zero interval. Unknown handlers are not an error here: the job is
    /// scheduled and fails with `NoHandlerError` on every tick.
    pub fn new(
        jobs: Vec<Job>,
        registry: &HandlerRegistry,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        if jobs.is_empty() {
            return Err(DeskError::ConfigError("no jobs to schedule".to_string()));
        }

        let mut entries = Vec::with_capacity(jobs.len());
        for job in jobs {
            if job.interval.is_zero() {
                return Err(DeskError::ConfigError(format!(
                    "job '{}' has a zero interval",
                    job.name
                )));
            }
            let action = build_action(&job, registry, runner.clone());
            entries.push((job, action));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn job_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(job, _)| job.name.as_str())
    }

    /// Start one timer per job. The first tick of each job fires one interval
    /// from now.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let timers = self
            .entries
            .into_iter()
            .map(|(job, action)| {
                info!(
                    job = %job.name,
                    kind = %job.kind,
                    interval = ?job.interval,
                    "scheduling job"
                );
                tokio::spawn(run_timer(job, action, shutdown_rx.clone()))
            })
            .collect();

        SchedulerHandle {
            timers,
            shutdown: shutdown_tx,
        }
    }

    /// Run until `shutdown` resolves, then stop all timers.
    ///
    /// Actions already dispatched are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let handle = self.start();
        info!(jobs = handle.timer_count(), "scheduler started");

        shutdown.await;

        info!("shutdown requested; stopping scheduler");
        handle.shutdown().await;
        Ok(())
    }
}

/// Running timers of a started [`Scheduler`].
#[derive(Debug)]
pub struct SchedulerHandle {
    timers: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl SchedulerHandle {
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Stop every timer and wait for them to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for timer in self.timers {
            if let Err(e) = timer.await {
                warn!(error = %e, "scheduler timer ended abnormally");
            }
        }
        debug!("all scheduler timers stopped");
    }
}

/// Bind `job` to the action that runs on each tick.
///
/// Shell jobs split their command on whitespace and run it through `runner`.
/// Handler jobs resolve against `registry`; an unknown identifier yields an
/// action that always fails with `NoHandlerError`.
pub fn build_action(
    job: &Job,
    registry: &HandlerRegistry,
    runner: Arc<dyn CommandRunner>,
) -> JobAction {
    match job.kind {
        JobKind::Shell => shell_action(job.command.clone(), runner),
        JobKind::Handler => match registry.resolve(job) {
            Some(action) => action,
            None => {
                warn!(job = %job.name, handler = %job.command, "no handler registered");
                missing_handler_action(job.command.clone())
            }
        },
    }
}

fn shell_action(command_line: String, runner: Arc<dyn CommandRunner>) -> JobAction {
    Arc::new(move || -> BoxFuture<'static, Result<()>> {
        Box::pin(run_shell(command_line.clone(), runner.clone()))
    })
}

async fn run_shell(command_line: String, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| DeskError::ConfigError("shell job has an empty command".to_string()))?;

    let request = ExecutionRequest::new(program).args(parts);
    let output = runner.run(request).await?;
    debug!(command = %command_line, output = %output.trim_end(), "shell job finished");
    Ok(())
}

fn missing_handler_action(handler: String) -> JobAction {
    Arc::new(move || -> BoxFuture<'static, Result<()>> {
        let handler = handler.clone();
        Box::pin(async move { Err(DeskError::NoHandlerError(handler)) })
    })
}

async fn run_timer(job: Job, action: JobAction, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = time::interval_at(Instant::now() + job.interval, job.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => dispatch(&job.name, &action),
            // An error means the handle was dropped: stop as well.
            _ = shutdown.changed() => break,
        }
    }

    debug!(job = %job.name, "timer stopped");
}

/// Run one tick of a job on its own task and log the outcome.
fn dispatch(name: &str, action: &JobAction) {
    let name = name.to_string();
    let action = action.clone();
    let run = tokio::spawn(async move { action().await });

    tokio::spawn(async move {
        debug!(job = %name, "running job");
        match run.await {
            Ok(Ok(())) => info!(job = %name, "job completed"),
            Ok(Err(e)) => error!(job = %name, error = %e, "job failed"),
            Err(e) if e.is_panic() => error!(job = %name, error = %e, "job panicked"),
            Err(e) => warn!(job = %name, error = %e, "job was cancelled"),
        }
    });
}
