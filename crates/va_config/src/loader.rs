//! Manifest loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// Loads and validates a `va.toml` manifest from an explicit file path.
pub fn load_config(manifest_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(manifest_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `va.toml` manifest from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.module.top.is_empty() {
        return Err(ConfigError::MissingField("module.top".to_string()));
    }
    Ok(())
}
