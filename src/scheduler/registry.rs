// src/scheduler/registry.rs

//! Handler identifiers mapped to action factories.
//!
//! The registry is built once per scheduler and only read afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::exec::BoxFuture;

use super::Job;

/// Zero-argument action run on every tick of a job.
pub type JobAction = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Binds a job (and its arguments) into a [`JobAction`].
pub type HandlerFactory = Arc<dyn Fn(&Job) -> JobAction + Send + Sync>;

#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, HandlerFactory>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, factory: HandlerFactory) -> &mut Self {
        self.handlers.insert(id.into(), factory);
        self
    }

    /// [`HandlerRegistry::register`] for a plain closure.
    pub fn register_fn<F>(&mut self, id: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&Job) -> JobAction + Send + Sync + 'static,
    {
        self.register(id, Arc::new(build))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Action for `job.command`, or `None` if the identifier is unknown.
    pub fn resolve(&self, job: &Job) -> Option<JobAction> {
        self.handlers.get(&job.command).map(|factory| factory(job))
    }
}
