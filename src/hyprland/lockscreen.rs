// src/hyprland/lockscreen.rs

//! Rewrites the message shown by hyprlock's `label { text = ... }` blocks.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use rand::seq::SliceRandom;
use regex::{Captures, Regex};
use tracing::{debug, error, warn};

use crate::errors::{DeskError, Result};
use crate::fs::{FileSystem, resolve_path};

use super::jokes::{JokeRegistry, apply_format, sanitize_for_label};

pub const DEFAULT_LOCK_MESSAGE: &str = "Powered by hyprlock 🔥";
pub const DEFAULT_FORMAT: &str = "👉 %s 🤪";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/hypr/hyprlock.conf";
pub const JOKE_ATTEMPTS: usize = 3;

static LABEL_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)(label\s*\{[^}]*?\btext\s*=\s*)[^\n]+").expect("label pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct LockScreenOptions {
    pub config_path: PathBuf,
    /// Explicit message; `None` falls back to [`DEFAULT_LOCK_MESSAGE`].
    pub message: Option<String>,
    /// Prefer a joke from one of `providers` over the message.
    pub jokes: bool,
    pub providers: Vec<String>,
    /// `%s` is replaced with the message; empty disables formatting.
    pub format: String,
    /// Compute the message but leave the config untouched.
    pub dry_run: bool,
    /// Pause between joke fetch attempts.
    pub retry_delay: Duration,
}

impl Default for LockScreenOptions {
    fn default() -> Self {
        Self {
            config_path: resolve_path(DEFAULT_CONFIG_PATH),
            message: None,
            jokes: false,
            providers: vec!["fortune".to_string()],
            format: DEFAULT_FORMAT.to_string(),
            dry_run: false,
            retry_delay: Duration::from_millis(500),
        }
    }
}

pub struct LockScreenUpdater {
    fs: Arc<dyn FileSystem>,
    jokes: Arc<JokeRegistry>,
}

impl fmt::Debug for LockScreenUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockScreenUpdater")
            .field("fs", &self.fs)
            .field("jokes", &self.jokes)
            .finish()
    }
}

impl LockScreenUpdater {
    pub fn new(fs: Arc<dyn FileSystem>, jokes: Arc<JokeRegistry>) -> Self {
        Self { fs, jokes }
    }

    /// Resolve the message, then write it into every label of the config.
    /// Returns the formatted message.
    pub async fn update(&self, options: &LockScreenOptions) -> Result<String> {
        let path = &options.config_path;
        let content = self.fs.read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "error reading hyprlock config");
            DeskError::Other(e)
        })?;

        let raw = self.resolve_message(options).await;
        debug!(message = %raw, "raw lock screen message");
        let message = apply_format(&sanitize_for_label(&raw), &options.format);

        if options.dry_run {
            debug!(path = %path.display(), "dry run; not writing hyprlock config");
            return Ok(message);
        }

        let updated = replace_label_text(&content, &message);
        self.fs.write(path, updated.as_bytes()).map_err(|e| {
            error!(path = %path.display(), error = %e, "error writing hyprlock config");
            DeskError::Other(e)
        })?;

        Ok(message)
    }

    /// Joke (when enabled and obtainable), else explicit message, else the
    /// default. Never fails.
    pub async fn resolve_message(&self, options: &LockScreenOptions) -> String {
        if options.jokes {
            return match self.fetch_joke(options).await {
                Ok(joke) => joke,
                Err(e) => {
                    warn!(error = %e, "could not fetch a joke; using default message");
                    DEFAULT_LOCK_MESSAGE.to_string()
                }
            };
        }

        match options.message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => DEFAULT_LOCK_MESSAGE.to_string(),
        }
    }

    async fn fetch_joke(&self, options: &LockScreenOptions) -> Result<String> {
        let name = options
            .providers
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| DeskError::ConfigError("no joke providers configured".to_string()))?;

        let provider = self.jokes.get(&name).ok_or_else(|| {
            DeskError::ConfigError(format!("joke provider '{name}' not found"))
        })?;

        let mut last_err = None;
        for attempt in 1..=JOKE_ATTEMPTS {
            match provider.fetch().await {
                Ok(joke) => {
                    debug!(provider = %name, attempt, "fetched joke");
                    return Ok(joke);
                }
                Err(e) => {
                    debug!(provider = %name, attempt, error = %e, "joke fetch failed");
                    last_err = Some(e);
                }
            }
            if attempt < JOKE_ATTEMPTS {
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        Err(DeskError::Other(anyhow::anyhow!(
            "failed to fetch joke from '{name}' after {JOKE_ATTEMPTS} attempts: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

/// Replace the value of `text = ...` inside every `label { }` block.
pub fn replace_label_text(content: &str, message: &str) -> String {
    LABEL_TEXT
        .replace_all(content, |caps: &Captures| format!("{}{}", &caps[1], message))
        .into_owned()
}
