// src/config/model.rs

use serde::Deserialize;

use crate::scheduler::{Job, JobArgs};
use crate::types::JobKind;

/// Job source as read from a TOML file, before validation.
///
/// ```toml
/// [[jobs]]
/// name = "wallpaper"
/// description = "Rotate the wallpaper"
/// type = "handler"
/// command = "$set_random_wallpaper"
/// interval = "30m"
/// args = { path = "~/Pictures/Wallpapers/Active" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobFile {
    #[serde(default)]
    pub jobs: Vec<RawJob>,
}

/// One `[[jobs]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// `"shell"` or `"handler"` (`"defined"` is accepted as well).
    #[serde(rename = "type")]
    pub kind: JobKind,

    /// Command line for shell jobs, handler identifier for handler jobs.
    pub command: String,

    /// Duration string such as `"90s"` or `"1h30m"`.
    pub interval: String,

    #[serde(default)]
    pub args: JobArgs,
}

/// Validated job source. Only built through `TryFrom<RawJobFile>`.
#[derive(Debug, Clone)]
pub struct JobFile {
    jobs: Vec<Job>,
}

impl JobFile {
    pub(crate) fn new_unchecked(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }
}
