//! Error types for spi-core

use thiserror::Error;

/// Result type alias using spi-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration values
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown service provider type
    #[error("Unknown service provider type: {provider}. Valid types: GitHub, GitLab, Quay, HostCredentials")]
    InvalidProviderType { provider: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid provider type error
    pub fn invalid_provider_type(provider: impl Into<String>) -> Self {
        Self::InvalidProviderType {
            provider: provider.into(),
        }
    }
}
