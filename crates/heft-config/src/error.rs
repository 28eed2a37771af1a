//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bundle name '{name}': only letters, digits and _ : / @ . {{ }} [ ] $ - are allowed")]
    InvalidBundleName { name: String },

    #[error("missing required field '{field}'")]
    MissingField { field: String, hint: String },

    #[error("invalid value '{value}' for '{field}'")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read configuration: {0}")]
    Extract(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Suggested fix, when one applies.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField { hint, .. } | ConfigError::InvalidValue { hint, .. } => {
                Some(hint)
            }
            ConfigError::InvalidBundleName { .. } => {
                Some("Rename the bundle, e.g. replace spaces with '-'")
            }
            ConfigError::FileNotFound(_) => {
                Some("Pass an existing file to --config or remove the flag to use discovery")
            }
            ConfigError::Extract(_) => Some("Check the config file syntax and field types"),
            ConfigError::Io(_) => None,
        }
    }
}
