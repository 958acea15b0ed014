// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::hyprland::notifications::NotificationProvider;
use crate::types::ReloadTarget;

/// Command-line arguments for `hyprdesk`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hyprdesk",
    version,
    about = "Reload, schedule and tweak a Hyprland desktop session.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HYPRDESK_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Reload the window manager, the status bar, or both.
    Reload {
        #[arg(value_enum, default_value_t = ReloadTarget::All)]
        target: ReloadTarget,

        /// Seconds to wait between stopping and restarting the status bar.
        #[arg(short, long, value_name = "SECS", default_value_t = 2)]
        wait: u64,
    },

    /// Run the periodic job scheduler until interrupted.
    Cron {
        /// Job source (TOML). Default: `$XDG_CONFIG_HOME/hypr/cron.toml`.
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Update the lock screen message once.
    Lock(LockArgs),

    /// Set a random wallpaper once.
    Wallpaper {
        /// Image file or directory searched recursively for images.
        #[arg(long, value_name = "PATH", default_value = "~/Pictures/Wallpapers/Active")]
        path: String,
    },

    /// Manage desktop notifications.
    Notifications {
        /// Close every notification.
        #[arg(long)]
        clear: bool,

        /// Notification daemon to talk to.
        #[arg(short, long, value_enum, default_value_t = NotificationProvider::Swaync)]
        provider: NotificationProvider,
    },

    /// Inspect or terminate processes by exact name.
    #[command(subcommand)]
    Process(ProcessCommand),
}

#[derive(Debug, Clone, Args)]
pub struct LockArgs {
    /// Message to show instead of the default.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Fetch a joke and use it as the message.
    #[arg(short, long)]
    pub jokes: bool,

    /// Joke provider to pick from (repeatable).
    #[arg(short, long = "provider", value_name = "NAME")]
    pub providers: Vec<String>,

    /// hyprlock configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Format of the label text; `%s` is replaced by the message.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the new text without writing the file.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProcessCommand {
    /// Print `true` if a process with this exact name is running.
    Running { name: String },
    /// Terminate every process with this exact name.
    Kill { name: String },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
