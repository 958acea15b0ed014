// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`request`] holds [`ExecutionRequest`], the value describing one command.
//! - [`runner`] provides the [`CommandRunner`] trait every component talks to.
//! - [`system`] contains [`SystemRunner`], the `tokio::process` implementation
//!   used in production. Tests swap in a fake runner instead.

pub mod request;
pub mod runner;
pub mod system;

pub use request::{DEFAULT_TIMEOUT_SECS, ExecutionRequest};
pub use runner::{BoxFuture, CommandRunner};
pub use system::SystemRunner;
