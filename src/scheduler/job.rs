// src/scheduler/job.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{DeskError, Result};
use crate::types::JobKind;

/// Loosely typed job argument, as written in the job source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl ArgValue {
    fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::Int(_) => "integer",
            ArgValue::Text(_) => "string",
            ArgValue::List(_) => "list",
        }
    }
}

/// Named arguments of a job with typed accessors.
///
/// Accessors return `Ok(None)` for a missing key and `ConfigError` for a key
/// holding the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct JobArgs(BTreeMap<String, ArgValue>);

impl JobArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn str(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ArgValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(wrong_type(key, "bool", other)),
        }
    }

    /// A list, or a single string promoted to a one-element list.
    pub fn list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ArgValue::List(items)) => Ok(Some(items.clone())),
            Some(ArgValue::Text(s)) => Ok(Some(vec![s.clone()])),
            Some(other) => Err(wrong_type(key, "list of strings", other)),
        }
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str(key)?
            .ok_or_else(|| DeskError::ConfigError(format!("missing required argument '{key}'")))
    }
}

impl FromIterator<(String, ArgValue)> for JobArgs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn wrong_type(key: &str, expected: &str, got: &ArgValue) -> DeskError {
    DeskError::ConfigError(format!(
        "argument '{key}' must be a {expected}, got {}",
        got.type_name()
    ))
}

/// One scheduled unit of work. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    pub description: String,
    pub kind: JobKind,
    /// Command line for `Shell`, handler identifier for `Handler`.
    pub command: String,
    pub args: JobArgs,
    pub interval: Duration,
}
