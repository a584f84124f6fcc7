//! Error types for project manifest loading and validation.

/// Errors that can occur when loading or validating a `va.toml` manifest.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the manifest file.
    #[error("failed to read manifest: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse manifest: {0}")]
    ParseError(String),

    /// A required field is missing from the manifest.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("module.top".to_string());
        assert_eq!(format!("{err}"), "missing required field: module.top");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(format!("{err}"), "failed to parse manifest: expected '=' at line 3");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("duplicate macro name".to_string());
        assert_eq!(format!("{err}"), "validation error: duplicate macro name");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read manifest:"));
    }
}
