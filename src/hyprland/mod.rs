// src/hyprland/mod.rs

//! Window-manager facing helpers.
//!
//! - Control-utility commands (`hyprctl reload`, `hyprctl monitors`,
//!   `hyprctl version`) and output parsing live here.
//! - [`wallpaper`] picks and applies a random wallpaper through hyprpaper.
//! - [`lockscreen`] rewrites the hyprlock label message.
//! - [`jokes`] is the provider registry the lock screen draws messages from.
//! - [`notifications`] clears the swaync or dunst notification history.

pub mod jokes;
pub mod lockscreen;
pub mod notifications;
pub mod wallpaper;

use tracing::debug;

use crate::errors::{DeskError, Result};
use crate::exec::{CommandRunner, ExecutionRequest};

/// Window-manager control utility.
pub const HYPRCTL: &str = "hyprctl";

/// Status bar binary managed by the reload workflow.
pub const STATUS_BAR: &str = "waybar";

pub fn reload_request() -> ExecutionRequest {
    ExecutionRequest::new(HYPRCTL).arg("reload")
}

pub fn version_request() -> ExecutionRequest {
    ExecutionRequest::new(HYPRCTL).arg("version")
}

pub fn monitors_request() -> ExecutionRequest {
    ExecutionRequest::new(HYPRCTL).arg("monitors")
}

/// Name of the first monitor reported by `hyprctl monitors`.
pub async fn monitor_name(runner: &dyn CommandRunner) -> Result<String> {
    let output = runner.run(monitors_request()).await?;

    let name = parse_monitor_name(&output).ok_or_else(|| {
        DeskError::Other(anyhow::anyhow!(
            "unexpected `hyprctl monitors` output: {:?}",
            output.lines().next().unwrap_or_default()
        ))
    })?;

    debug!(monitor = %name, "current monitor");
    Ok(name.to_string())
}

/// Second whitespace-delimited token of the first line, e.g. `eDP-1` in
/// `Monitor eDP-1 (ID 0):`.
pub fn parse_monitor_name(output: &str) -> Option<&str> {
    output.lines().next()?.split_whitespace().nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_name_is_second_token_of_first_line() {
        let output = "Monitor eDP-1 (ID 0):\n\t1920x1080@60.00000 at 0x0\n\nMonitor HDMI-A-1 (ID 1):\n";
        assert_eq!(parse_monitor_name(output), Some("eDP-1"));
    }

    #[test]
    fn monitor_name_missing_for_short_or_empty_output() {
        assert_eq!(parse_monitor_name(""), None);
        assert_eq!(parse_monitor_name("Monitor"), None);
    }
}
