// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod hyprland;
pub mod logging;
pub mod process;
pub mod reload;
pub mod scheduler;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command, LockArgs, ProcessCommand};
use crate::config::{default_config_path, load_and_validate};
use crate::exec::{CommandRunner, SystemRunner};
use crate::fs::{FileSystem, RealFileSystem, resolve_path};
use crate::hyprland::jokes::JokeRegistry;
use crate::hyprland::lockscreen::{LockScreenOptions, LockScreenUpdater};
use crate::hyprland::notifications::clear_notifications;
use crate::hyprland::wallpaper::WallpaperChanger;
use crate::process::{ProcessControl, ProcessManager};
use crate::reload::{ReloadOptions, ReloadOrchestrator, SessionEnv};
use crate::scheduler::{HandlerContext, HandlerRegistry, Scheduler};

/// High-level entry point used by `main.rs`.
///
/// Every subcommand runs against the real process runner and file system.
pub async fn run(args: CliArgs) -> Result<()> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Reload { target, wait } => {
            let processes = Arc::new(ProcessManager::new(runner.clone()));
            let options = ReloadOptions {
                kill_wait: Duration::from_secs(wait),
                ..ReloadOptions::default()
            };
            let orchestrator = ReloadOrchestrator::new(
                runner,
                processes,
                SessionEnv::from_process_env(),
                options,
            );
            orchestrator.reload(target).await?;
        }

        Command::Cron { config } => {
            let path = config.unwrap_or_else(default_config_path);
            info!(path = %path.display(), "loading job source");
            let jobs = load_and_validate(&path)?.into_jobs();

            let registry = HandlerRegistry::with_builtins(HandlerContext {
                runner: runner.clone(),
                fs,
                jokes: Arc::new(JokeRegistry::with_builtins(runner.clone())),
            });

            let scheduler = Scheduler::new(jobs, &registry, runner)?;
            scheduler.run_until(shutdown_signal()).await?;
        }

        Command::Lock(lock) => {
            let jokes = Arc::new(JokeRegistry::with_builtins(runner));
            let updater = LockScreenUpdater::new(fs, jokes);
            let message = updater.update(&lock_options(lock)).await?;
            println!("{message}");
        }

        Command::Wallpaper { path } => {
            let changer = WallpaperChanger::new(runner, fs);
            let image = changer.set_random_wallpaper(&resolve_path(&path)).await?;
            info!(image = %image.display(), "wallpaper set");
        }

        Command::Notifications { clear, provider } => {
            if clear {
                clear_notifications(runner.as_ref(), provider).await?;
            } else {
                warn!("no notification action specified; pass --clear");
            }
        }

        Command::Process(command) => {
            let processes = ProcessManager::new(runner);
            match command {
                ProcessCommand::Running { name } => {
                    println!("{}", processes.is_running(&name).await);
                }
                ProcessCommand::Kill { name } => processes.kill(&name).await?,
            }
        }
    }

    Ok(())
}

fn lock_options(args: LockArgs) -> LockScreenOptions {
    let mut options = LockScreenOptions {
        message: args.message,
        jokes: args.jokes,
        dry_run: args.dry_run,
        ..LockScreenOptions::default()
    };
    if let Some(config) = args.config {
        options.config_path = resolve_path(&config);
    }
    if let Some(format) = args.format {
        options.format = format;
    }
    if !args.providers.is_empty() {
        options.providers = args.providers;
    }
    options
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
