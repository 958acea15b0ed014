// src/reload/session.rs

//! Snapshot of the windowing-session environment markers.

use tracing::warn;

use crate::errors::{DeskError, Result};

/// Primary marker: absent means no Wayland display to talk to.
pub const DISPLAY_MARKER: &str = "WAYLAND_DISPLAY";

/// Secondary marker: absent usually means "not inside a Hyprland session".
pub const INSTANCE_MARKER: &str = "HYPRLAND_INSTANCE_SIGNATURE";

/// Values of the two session markers. Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEnv {
    pub display: Option<String>,
    pub instance_signature: Option<String>,
}

impl SessionEnv {
    pub fn new(display: Option<&str>, instance_signature: Option<&str>) -> Self {
        Self {
            display: non_empty(display.map(str::to_string)),
            instance_signature: non_empty(instance_signature.map(str::to_string)),
        }
    }

    /// Read both markers from the current process environment.
    pub fn from_process_env() -> Self {
        Self {
            display: non_empty(std::env::var(DISPLAY_MARKER).ok()),
            instance_signature: non_empty(std::env::var(INSTANCE_MARKER).ok()),
        }
    }

    /// Missing display is fatal; a missing instance signature only warns.
    pub fn validate(&self) -> Result<()> {
        if self.instance_signature.is_none() {
            warn!("{INSTANCE_MARKER} not set, may not be in a Hyprland session");
        }

        if self.display.is_none() {
            return Err(DeskError::EnvironmentError(format!(
                "not running in a Wayland session ({DISPLAY_MARKER} is not set)"
            )));
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_display_is_fatal() {
        let env = SessionEnv::new(Some(""), Some("abc"));
        assert!(matches!(env.validate(), Err(DeskError::EnvironmentError(_))));
    }

    #[test]
    fn missing_instance_signature_is_only_a_warning() {
        let env = SessionEnv::new(Some("wayland-1"), None);
        assert!(env.validate().is_ok());
    }
}
