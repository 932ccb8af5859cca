//! Host credentials provider
//!
//! Credentials for hosts that aren't a known service provider. Tokens match
//! by host alone and nothing is known about permissions.

use async_trait::async_trait;
use reqwest::StatusCode;
use spi_core::types::{
    Matchable, ServiceProviderType, SpiAccessCheck, SpiAccessCheckAccessibility,
    SpiAccessCheckStatus, SpiAccessToken, SpiAccessTokenBinding, TokenMetadata, Validated,
};
use spi_core::ServiceProviderConfiguration;
use spi_tokenstorage::TokenStorage;
use std::sync::Arc;
use tracing::info;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::filter::{default_remote_secret_filter, new_filter, RemoteSecretFilter, TokenFilterFn};
use crate::lookup::GenericLookup;
use crate::metadata::{MetadataProvider, NeverMetadataExpirationPolicy};
use crate::store::ObjectStore;
use crate::traits::{ServiceProvider, ValidationResult};
use crate::url::repo_url_from_schemaless_string;

const PROVIDER: &str = "host credentials";

/// Metadata of a host token is just the username it was stored with
struct HostCredentialsMetadataProvider {
    token_storage: Arc<dyn TokenStorage>,
}

#[async_trait]
impl MetadataProvider for HostCredentialsMetadataProvider {
    async fn fetch(&self, token: &SpiAccessToken) -> Result<Option<TokenMetadata>> {
        Ok(self.token_storage.get(token).await?.map(|data| TokenMetadata {
            username: data.username.clone(),
            ..Default::default()
        }))
    }
}

pub struct HostCredentialsProvider {
    base_url: String,
    lookup: GenericLookup,
    http_client: reqwest::Client,
}

impl HostCredentialsProvider {
    pub fn new(factory: &Factory, config: &ServiceProviderConfiguration) -> Result<Self> {
        let base_url = config
            .base_url()
            .ok_or_else(|| Error::configuration("host credentials require a base url"))?;

        let remote_secret_filter: Arc<dyn RemoteSecretFilter> = Arc::new(default_remote_secret_filter);
        let lookup = GenericLookup {
            service_provider_type: ServiceProviderType::HostCredentials,
            token_filter: new_filter(
                factory.configuration.token_match_policy,
                Arc::new(TokenFilterFn::new(|_, _| Ok(true))),
            ),
            remote_secret_filter: Some(remote_secret_filter),
            metadata_provider: Arc::new(HostCredentialsMetadataProvider {
                token_storage: factory.token_storage.clone(),
            }),
            metadata_cache: Arc::new(
                factory.new_cache_with_expiration_policy(Arc::new(NeverMetadataExpirationPolicy)),
            ),
            token_storage: factory.token_storage.clone(),
            repo_url_parser: repo_url_from_schemaless_string,
            max_concurrency: factory.configuration.lookup_concurrency,
        };

        Ok(Self {
            base_url,
            lookup,
            http_client: factory.http_client.clone(),
        })
    }
}

#[async_trait]
impl ServiceProvider for HostCredentialsProvider {
    fn provider_type(&self) -> ServiceProviderType {
        ServiceProviderType::HostCredentials
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn lookup_tokens(
        &self,
        store: &dyn ObjectStore,
        binding: &SpiAccessTokenBinding,
    ) -> Result<Vec<SpiAccessToken>> {
        self.lookup
            .lookup(store, binding)
            .await
            .map_err(|e| Error::provider(PROVIDER, "token lookup", e))
    }

    async fn lookup_credentials(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
    ) -> Result<Option<Credentials>> {
        self.lookup
            .lookup_credentials(store, matchable)
            .await
            .map_err(|e| Error::provider(PROVIDER, "credentials lookup", e))
    }

    async fn persist_metadata(&self, token: &mut SpiAccessToken) -> Result<()> {
        self.lookup
            .persist_metadata(token)
            .await
            .map_err(|e| Error::provider(PROVIDER, "metadata persistence", e))
    }

    /// Only public repositories can be recognized
    async fn check_repository_access(
        &self,
        _store: &dyn ObjectStore,
        access_check: &SpiAccessCheck,
    ) -> Result<SpiAccessCheckStatus> {
        let mut status = SpiAccessCheckStatus::unknown(ServiceProviderType::HostCredentials);

        let repo_url = repo_url_from_schemaless_string(&access_check.spec.repo_url)?;
        let response = self.http_client.get(repo_url).send().await?;
        match response.status() {
            StatusCode::OK => {
                status.accessible = true;
                status.accessibility = SpiAccessCheckAccessibility::Public;
            }
            StatusCode::NOT_FOUND => {}
            code => info!(
                code = code.as_u16(),
                repo_url = %access_check.spec.repo_url,
                "unexpected return code for repo"
            ),
        }
        Ok(status)
    }

    fn validate(&self, _validated: &dyn Validated) -> ValidationResult {
        ValidationResult::default()
    }
}
