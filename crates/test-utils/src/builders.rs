#![allow(dead_code)]

use std::time::Duration;

use hyprdesk::scheduler::{ArgValue, Job, JobArgs};
use hyprdesk::types::JobKind;

/// Builder for `Job` to simplify test setup. Defaults to a one-second
/// interval.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn shell(name: &str, command: &str) -> Self {
        Self::new(name, JobKind::Shell, command)
    }

    pub fn handler(name: &str, id: &str) -> Self {
        Self::new(name, JobKind::Handler, id)
    }

    fn new(name: &str, kind: JobKind, command: &str) -> Self {
        Self {
            job: Job {
                name: name.to_string(),
                description: String::new(),
                kind,
                command: command.to_string(),
                args: JobArgs::new(),
                interval: Duration::from_secs(1),
            },
        }
    }

    pub fn every(mut self, interval: Duration) -> Self {
        self.job.interval = interval;
        self
    }

    pub fn arg(mut self, key: &str, value: ArgValue) -> Self {
        self.job.args.insert(key, value);
        self
    }

    pub fn text_arg(self, key: &str, value: &str) -> Self {
        self.arg(key, ArgValue::Text(value.to_string()))
    }

    pub fn build(self) -> Job {
        self.job
    }
}
