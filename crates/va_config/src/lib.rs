//! Parsing and validation of `va.toml` project manifests (§1.1).
//!
//! This crate reads the optional project manifest and produces a
//! strongly-typed [`ProjectConfig`]: the top module name, include-path
//! list, predefined macros, and preamble file path. The CLI falls back to
//! built-in defaults when no manifest is present.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ModuleConfig, ProjectConfig};
