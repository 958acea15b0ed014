// src/hyprland/notifications.rs

//! Clearing the notification daemon.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::{error, info};

use crate::errors::{DeskError, Result};
use crate::exec::{CommandRunner, ExecutionRequest};

pub const SWAYNC_CLIENT: &str = "swaync-client";
pub const DUNSTCTL: &str = "dunstctl";

/// Notification daemons whose history can be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NotificationProvider {
    #[default]
    Swaync,
    Dunst,
}

impl NotificationProvider {
    pub fn clear_request(self) -> ExecutionRequest {
        match self {
            NotificationProvider::Swaync => ExecutionRequest::new(SWAYNC_CLIENT).arg("--close-all"),
            NotificationProvider::Dunst => ExecutionRequest::new(DUNSTCTL).arg("history-clear"),
        }
    }
}

impl fmt::Display for NotificationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationProvider::Swaync => f.write_str("swaync"),
            NotificationProvider::Dunst => f.write_str("dunst"),
        }
    }
}

impl FromStr for NotificationProvider {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "swaync" => Ok(NotificationProvider::Swaync),
            "dunst" => Ok(NotificationProvider::Dunst),
            other => Err(DeskError::ConfigError(format!(
                "unsupported notification provider: {other} (expected \"swaync\" or \"dunst\")"
            ))),
        }
    }
}

/// Close every notification shown by `provider`.
pub async fn clear_notifications(
    runner: &dyn CommandRunner,
    provider: NotificationProvider,
) -> Result<()> {
    match runner.run(provider.clear_request()).await {
        Ok(_) => {
            info!(%provider, "all notifications cleared");
            Ok(())
        }
        Err(e) => {
            error!(%provider, error = %e, "failed to clear notifications");
            Err(e)
        }
    }
}
