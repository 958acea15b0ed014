// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Which managed components a reload touches.
///
/// - `All`: status bar first, then the window manager, then a health check of
///   both.
/// - `WindowManager`: reload the compositor configuration only.
/// - `StatusBar`: (re)start the bar only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReloadTarget {
    All,
    #[value(name = "hyprland", alias = "window-manager")]
    #[serde(rename = "hyprland", alias = "window-manager")]
    WindowManager,
    #[value(name = "waybar", alias = "status-bar")]
    #[serde(rename = "waybar", alias = "status-bar")]
    StatusBar,
}

impl ReloadTarget {
    pub fn includes_window_manager(self) -> bool {
        matches!(self, ReloadTarget::All | ReloadTarget::WindowManager)
    }

    pub fn includes_status_bar(self) -> bool {
        matches!(self, ReloadTarget::All | ReloadTarget::StatusBar)
    }
}

impl Default for ReloadTarget {
    fn default() -> Self {
        ReloadTarget::All
    }
}

impl fmt::Display for ReloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadTarget::All => f.write_str("all"),
            ReloadTarget::WindowManager => f.write_str("hyprland"),
            ReloadTarget::StatusBar => f.write_str("waybar"),
        }
    }
}

impl FromStr for ReloadTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ReloadTarget::All),
            "hyprland" | "window-manager" => Ok(ReloadTarget::WindowManager),
            "waybar" | "status-bar" => Ok(ReloadTarget::StatusBar),
            other => Err(format!(
                "invalid component '{other}' (expected \"all\", \"hyprland\" or \"waybar\")"
            )),
        }
    }
}

/// How a scheduled job is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// `command` is a command line run through the command runner.
    Shell,
    /// `command` names an entry of the handler registry.
    #[serde(alias = "defined")]
    Handler,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Shell => f.write_str("shell"),
            JobKind::Handler => f.write_str("handler"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_target_parses_names_and_aliases() {
        assert_eq!("all".parse::<ReloadTarget>(), Ok(ReloadTarget::All));
        assert_eq!("Hyprland".parse::<ReloadTarget>(), Ok(ReloadTarget::WindowManager));
        assert_eq!("status-bar".parse::<ReloadTarget>(), Ok(ReloadTarget::StatusBar));
        assert!("compositor".parse::<ReloadTarget>().is_err());
    }

    #[test]
    fn reload_target_component_membership() {
        assert!(ReloadTarget::All.includes_status_bar());
        assert!(ReloadTarget::All.includes_window_manager());
        assert!(!ReloadTarget::WindowManager.includes_status_bar());
        assert!(!ReloadTarget::StatusBar.includes_window_manager());
    }
}
