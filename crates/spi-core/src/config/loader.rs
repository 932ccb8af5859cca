//! Configuration file loading and parsing

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

use super::OperatorConfiguration;
use crate::error::{Error, Result};

/// Environment variable pointing at the configuration file
pub const CONFIG_FILE_ENV: &str = "SPI_CONFIG_FILE";

impl OperatorConfiguration {
    /// Load configuration from the given path, or from `SPI_CONFIG_FILE`
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_owned(),
            None => std::env::var(CONFIG_FILE_ENV)
                .map(Utf8PathBuf::from)
                .map_err(|_| Error::config_not_found(format!("{CONFIG_FILE_ENV} is not set")))?,
        };

        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        debug!("Loading operator configuration from {}", path);
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: OperatorConfiguration = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't
    pub fn validate(&self) -> Result<()> {
        if self.lookup_concurrency == 0 {
            return Err(Error::invalid_config("lookupConcurrency must be at least 1"));
        }

        for (i, sp) in self.service_providers.iter().enumerate() {
            if self.service_providers[..i]
                .iter()
                .any(|other| other.service_provider_type == sp.service_provider_type
                    && other.base_url() == sp.base_url())
            {
                return Err(Error::invalid_config(format!(
                    "service provider {} is configured more than once",
                    sp.service_provider_type
                )));
            }

            if sp.base_url().is_none() {
                return Err(Error::invalid_config(format!(
                    "service provider {} requires serviceProviderBaseUrl",
                    sp.service_provider_type
                )));
            }
        }

        Ok(())
    }
}
