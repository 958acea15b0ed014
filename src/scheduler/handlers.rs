// src/scheduler/handlers.rs

//! Built-in named handlers.
//!
//! - `$set_random_wallpaper` (args: `path`)
//! - `$update_lock_screen_phrase` (args: `config`, `jokes`, `message`,
//!   `format`, `provider`)
//!
//! Arguments are read when the action runs, so a mistyped argument fails that
//! run with `ConfigError` instead of taking the scheduler down.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::exec::{BoxFuture, CommandRunner};
use crate::fs::{FileSystem, resolve_path};
use crate::hyprland::jokes::JokeRegistry;
use crate::hyprland::lockscreen::{LockScreenOptions, LockScreenUpdater};
use crate::hyprland::wallpaper::WallpaperChanger;

use super::{HandlerRegistry, Job, JobAction, JobArgs};

pub const SET_RANDOM_WALLPAPER: &str = "$set_random_wallpaper";
pub const UPDATE_LOCK_SCREEN_PHRASE: &str = "$update_lock_screen_phrase";

/// Collaborators shared by the built-in handlers.
#[derive(Clone)]
pub struct HandlerContext {
    pub runner: Arc<dyn CommandRunner>,
    pub fs: Arc<dyn FileSystem>,
    pub jokes: Arc<JokeRegistry>,
}

impl fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContext")
            .field("fs", &self.fs)
            .field("jokes", &self.jokes)
            .finish_non_exhaustive()
    }
}

impl HandlerRegistry {
    /// Registry pre-populated with the built-in handlers.
    pub fn with_builtins(ctx: HandlerContext) -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry, ctx);
        registry
    }
}

pub fn register_builtins(registry: &mut HandlerRegistry, ctx: HandlerContext) {
    let wallpaper_ctx = ctx.clone();
    registry.register_fn(SET_RANDOM_WALLPAPER, move |job: &Job| {
        wallpaper_action(wallpaper_ctx.clone(), job.args.clone())
    });

    registry.register_fn(UPDATE_LOCK_SCREEN_PHRASE, move |job: &Job| {
        lock_screen_action(ctx.clone(), job.args.clone())
    });
}

fn wallpaper_action(ctx: HandlerContext, args: JobArgs) -> JobAction {
    Arc::new(move || -> BoxFuture<'static, Result<()>> {
        Box::pin(set_random_wallpaper(ctx.clone(), args.clone()))
    })
}

fn lock_screen_action(ctx: HandlerContext, args: JobArgs) -> JobAction {
    Arc::new(move || -> BoxFuture<'static, Result<()>> {
        Box::pin(update_lock_screen(ctx.clone(), args.clone()))
    })
}

async fn set_random_wallpaper(ctx: HandlerContext, args: JobArgs) -> Result<()> {
    let path = resolve_path(args.require_str("path")?);
    let changer = WallpaperChanger::new(ctx.runner, ctx.fs);
    changer.set_random_wallpaper(&path).await?;
    Ok(())
}

async fn update_lock_screen(ctx: HandlerContext, args: JobArgs) -> Result<()> {
    let options = lock_screen_options(&args)?;
    let updater = LockScreenUpdater::new(ctx.fs, ctx.jokes);
    let message = updater.update(&options).await?;
    debug!(message = %message, "lock screen message updated");
    Ok(())
}

/// Defaults overridden by whichever arguments the job provides.
pub fn lock_screen_options(args: &JobArgs) -> Result<LockScreenOptions> {
    let mut options = LockScreenOptions::default();

    if let Some(config) = args.str("config")? {
        options.config_path = resolve_path(config);
    }
    if let Some(jokes) = args.bool("jokes")? {
        options.jokes = jokes;
    }
    if let Some(message) = args.str("message")? {
        options.message = Some(message.to_string());
    }
    if let Some(format) = args.str("format")? {
        options.format = format.to_string();
    }
    if let Some(providers) = args.list("provider")? {
        options.providers = providers;
    }

    Ok(options)
}
