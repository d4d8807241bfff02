//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Project-local YAML files under `.smae/`
//! - An explicit `--config` file
//! - `SMAE_*` environment variable overrides
//! - Validation of the merged result

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
