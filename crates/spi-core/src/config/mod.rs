//! Operator configuration

mod loader;

pub use loader::CONFIG_FILE_ENV;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ServiceProviderType;

/// Default bound on concurrent candidate evaluations during token lookup
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 16;

/// How strictly stored tokens must match the permissions of a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenMatchPolicy {
    /// Any token accepted by the service provider matches
    #[default]
    Any,
    /// The token must also declare every permission the request needs
    Exact,
}

/// OAuth application settings of a service provider
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Settings of one configured service provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderConfiguration {
    #[serde(rename = "type")]
    pub service_provider_type: ServiceProviderType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2_config: Option<OAuth2Config>,
}

impl ServiceProviderConfiguration {
    pub fn new(service_provider_type: ServiceProviderType) -> Self {
        Self {
            service_provider_type,
            service_provider_base_url: None,
            oauth2_config: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service_provider_base_url = Some(base_url.into());
        self
    }

    /// Configured base URL without a trailing slash, or the provider default
    pub fn base_url(&self) -> Option<String> {
        self.service_provider_base_url
            .as_deref()
            .or_else(|| self.service_provider_type.default_base_url())
            .map(|url| url.trim_end_matches('/').to_string())
    }
}

/// Top-level operator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfiguration {
    /// Base URL of the OAuth service
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub token_match_policy: TokenMatchPolicy,

    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    #[serde(default)]
    pub service_providers: Vec<ServiceProviderConfiguration>,
}

fn default_lookup_concurrency() -> usize {
    DEFAULT_LOOKUP_CONCURRENCY
}

impl Default for OperatorConfiguration {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_match_policy: TokenMatchPolicy::default(),
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            service_providers: Vec::new(),
        }
    }
}

impl OperatorConfiguration {
    /// Configuration of the given provider type, if present
    pub fn service_provider(
        &self,
        service_provider_type: ServiceProviderType,
    ) -> Option<&ServiceProviderConfiguration> {
        self.service_providers
            .iter()
            .find(|sp| sp.service_provider_type == service_provider_type)
    }
}
