// src/hyprland/jokes.rs

//! Message providers for the lock screen.
//!
//! Providers are held in an explicit [`JokeRegistry`] value that is handed to
//! whoever needs it; there is no process-wide provider table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{DeskError, Result};
use crate::exec::{BoxFuture, CommandRunner, ExecutionRequest};

/// Longest message (in characters) placed on the lock screen before it is cut.
pub const MAX_MESSAGE_CHARS: usize = 100;

/// Something that can produce a short text on demand.
pub trait JokeProvider: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<String>>;
}

/// Provider that runs a command and uses its trimmed stdout.
pub struct CommandJokeProvider {
    runner: Arc<dyn CommandRunner>,
    request: ExecutionRequest,
}

impl CommandJokeProvider {
    pub fn new(runner: Arc<dyn CommandRunner>, request: ExecutionRequest) -> Self {
        Self { runner, request }
    }

    /// `fortune -s`: short fortunes only.
    pub fn fortune(runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(runner, ExecutionRequest::new("fortune").arg("-s").timeout_secs(5))
    }
}

impl JokeProvider for CommandJokeProvider {
    fn fetch(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let output = self.runner.run(self.request.clone()).await?;
            let text = output.trim();
            if text.is_empty() {
                return Err(DeskError::Other(anyhow::anyhow!(
                    "'{}' produced no text",
                    self.request.command_line()
                )));
            }
            Ok(text.to_string())
        })
    }
}

#[derive(Default, Clone)]
pub struct JokeRegistry {
    providers: BTreeMap<String, Arc<dyn JokeProvider>>,
}

impl fmt::Debug for JokeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JokeRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl JokeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in providers (`fortune`).
    pub fn with_builtins(runner: Arc<dyn CommandRunner>) -> Self {
        let mut registry = Self::new();
        registry.register("fortune", Arc::new(CommandJokeProvider::fortune(runner)));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn JokeProvider>) -> &mut Self {
        self.providers.insert(name.into(), provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn JokeProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

/// Make arbitrary text safe for a single-line hyprlock label.
///
/// Newlines become `<br/>`, double quotes become a quote glyph, backslashes
/// become spaces, and anything longer than [`MAX_MESSAGE_CHARS`] is cut with
/// a trailing `...`.
pub fn sanitize_for_label(text: &str) -> String {
    let cleaned = text
        .replace('\n', "<br/>")
        .replace('"', "\u{f027e}")
        .replace('\\', " ");

    if cleaned.chars().count() > MAX_MESSAGE_CHARS {
        let cut: String = cleaned.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{cut}...")
    } else {
        cleaned
    }
}

/// Substitute `message` for the first `%s` in `format`. A format without a
/// placeholder is returned as-is, an empty format yields the bare message.
pub fn apply_format(message: &str, format: &str) -> String {
    if format.is_empty() {
        return message.to_string();
    }
    format.replacen("%s", message, 1)
}
