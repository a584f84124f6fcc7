//! The `va.toml` project manifest shape (§1.1).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parsed, validated `va.toml` manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// The `[module]` table.
    pub module: ModuleConfig,
    /// Directories searched for `` `include`` files, after the current
    /// file's own directory. Defaults to empty.
    #[serde(default)]
    pub include_dirs: Vec<String>,
    /// Object-like macros predefined before the source file is
    /// preprocessed, as if each were a `` `define NAME VALUE`` at the top
    /// of the file. Defaults to empty.
    #[serde(default)]
    pub defines: BTreeMap<String, String>,
    /// Path to a disciplines/natures preamble file, included ahead of the
    /// source file. When absent, the CLI falls back to the built-in
    /// `electrical` discipline preamble (§6).
    #[serde(default)]
    pub preamble: Option<String>,
}

/// The `[module]` table: which module in the source file is the one to
/// compile when a file declares more than one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// The top-level module's name.
    #[serde(default)]
    pub top: String,
}
