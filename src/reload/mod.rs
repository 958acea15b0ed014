// src/reload/mod.rs

//! Reload workflow for the window manager and the status bar.
//!
//! Order of operations for every target:
//! 1. [`SessionEnv::validate`]: no side effects happen without a display.
//! 2. Dependency check: every required binary must be on `PATH`.
//! 3. Reload action(s) for the target.
//! 4. Post-action health check.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{ReloadOptions, ReloadOrchestrator};
pub use session::{DISPLAY_MARKER, INSTANCE_MARKER, SessionEnv};
