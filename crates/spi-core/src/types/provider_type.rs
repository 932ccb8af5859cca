//! Service provider types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The closed set of service providers the operator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ServiceProviderType {
    GitHub,
    GitLab,
    Quay,
    HostCredentials,
}

impl ServiceProviderType {
    /// Value used in the provider type label of access tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceProviderType::GitHub => "GitHub",
            ServiceProviderType::GitLab => "GitLab",
            ServiceProviderType::Quay => "Quay",
            ServiceProviderType::HostCredentials => "HostCredentials",
        }
    }

    /// Base URL used when the configuration doesn't provide one
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ServiceProviderType::GitHub => Some("https://github.com"),
            ServiceProviderType::GitLab => Some("https://gitlab.com"),
            ServiceProviderType::Quay => Some("https://quay.io"),
            ServiceProviderType::HostCredentials => None,
        }
    }
}

impl std::fmt::Display for ServiceProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceProviderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(ServiceProviderType::GitHub),
            "gitlab" => Ok(ServiceProviderType::GitLab),
            "quay" => Ok(ServiceProviderType::Quay),
            "hostcredentials" => Ok(ServiceProviderType::HostCredentials),
            _ => Err(Error::invalid_provider_type(s)),
        }
    }
}
