//! Service provider construction

use spi_core::types::ServiceProviderType;
use spi_core::{OperatorConfiguration, ServiceProviderConfiguration};
use spi_tokenstorage::TokenStorage;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::gitlab::Gitlab;
use crate::hostcredentials::HostCredentialsProvider;
use crate::metadata::{MetadataCache, MetadataExpirationPolicy};
use crate::store::ObjectStore;
use crate::traits::ServiceProvider;
use crate::url::{host_of, repo_url_from_schemaless_string};

/// Shared collaborators of every service provider
#[derive(Clone)]
pub struct Factory {
    pub configuration: Arc<OperatorConfiguration>,
    pub http_client: reqwest::Client,
    pub token_storage: Arc<dyn TokenStorage>,
    /// Where refreshed token metadata is persisted
    pub store: Arc<dyn ObjectStore>,
}

impl Factory {
    pub fn new(
        configuration: Arc<OperatorConfiguration>,
        http_client: reqwest::Client,
        token_storage: Arc<dyn TokenStorage>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            configuration,
            http_client,
            token_storage,
            store,
        }
    }

    pub fn new_cache_with_expiration_policy(
        &self,
        policy: Arc<dyn MetadataExpirationPolicy>,
    ) -> MetadataCache {
        MetadataCache::new(self.store.clone(), policy)
    }

    /// Build the provider described by `config`
    pub fn create_provider(&self, config: &ServiceProviderConfiguration) -> Result<Box<dyn ServiceProvider>> {
        match config.service_provider_type {
            ServiceProviderType::GitLab => Ok(Box::new(Gitlab::new(self, config)?)),
            ServiceProviderType::HostCredentials => Ok(Box::new(HostCredentialsProvider::new(self, config)?)),
            other @ (ServiceProviderType::GitHub | ServiceProviderType::Quay) => Err(Error::configuration(
                format!("service provider type {other} is not supported"),
            )),
        }
    }

    /// Build every configured provider
    pub fn create_all(&self) -> Result<Vec<Box<dyn ServiceProvider>>> {
        self.configuration
            .service_providers
            .iter()
            .map(|config| self.create_provider(config))
            .collect()
    }

    /// The configured provider serving the repository's host, or host credentials for it
    pub fn from_repo_url(&self, repo_url: &str) -> Result<Box<dyn ServiceProvider>> {
        let url = repo_url_from_schemaless_string(repo_url)?;
        let host = host_of(&url);

        let configured = self.configuration.service_providers.iter().find(|config| {
            config
                .base_url()
                .and_then(|base| repo_url_from_schemaless_string(&base).ok())
                .is_some_and(|base| host_of(&base) == host)
        });

        if let Some(config) = configured {
            debug!("Using {} provider for {}", config.service_provider_type, repo_url);
            return self.create_provider(config);
        }

        debug!("No provider configured for {}, using host credentials", host);
        let config = ServiceProviderConfiguration::new(ServiceProviderType::HostCredentials)
            .with_base_url(format!("{}://{}", url.scheme(), host));
        self.create_provider(&config)
    }
}
