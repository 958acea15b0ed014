// src/config/mod.rs

//! Job source loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a job source from disk.
//! - `validate.rs`: turning raw entries into [`crate::scheduler::Job`]s.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{JobFile, RawJob, RawJobFile};
pub use validate::parse_interval;
