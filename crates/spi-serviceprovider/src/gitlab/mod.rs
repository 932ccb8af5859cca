//! GitLab service provider

mod client;
mod download;
mod metadata;
mod scopes;
mod url_matcher;

pub use client::{GitlabClient, GitlabClientBuilder, Project, Visibility};
pub use download::GitlabDownloadFileCapability;
pub use metadata::{GitlabMetadataProvider, GitlabTokenFilter};
pub use scopes::{is_valid_scope, translate_to_gitlab_scopes, GitlabOAuthCapability};
pub use url_matcher::RepoUrlMatcher;

use async_trait::async_trait;
use reqwest::StatusCode;
use spi_core::types::{
    Matchable, ServiceProviderType, SpiAccessCheck, SpiAccessCheckAccessibility,
    SpiAccessCheckErrorReason, SpiAccessCheckStatus, SpiAccessToken, SpiAccessTokenBinding,
    Validated,
};
use spi_core::ServiceProviderConfiguration;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::filter::{default_remote_secret_filter, new_filter, RemoteSecretFilter};
use crate::lookup::GenericLookup;
use crate::metadata::NeverMetadataExpirationPolicy;
use crate::store::ObjectStore;
use crate::traits::{DownloadFileCapability, OAuthCapability, ServiceProvider, ValidationResult};
use crate::url::repo_url_from_schemaless_string;

const PROVIDER: &str = "gitlab";

pub struct Gitlab {
    base_url: String,
    lookup: GenericLookup,
    http_client: reqwest::Client,
    client_builder: GitlabClientBuilder,
    repo_url_matcher: RepoUrlMatcher,
    oauth_capability: Option<GitlabOAuthCapability>,
    download_file_capability: GitlabDownloadFileCapability,
}

impl Gitlab {
    pub fn new(factory: &Factory, config: &ServiceProviderConfiguration) -> Result<Self> {
        let base_url = config
            .base_url()
            .ok_or_else(|| Error::configuration("GitLab service provider requires a base url"))?;

        let client_builder = GitlabClientBuilder::new(factory.http_client.clone(), &base_url);
        let repo_url_matcher = RepoUrlMatcher::new(&base_url)?;
        let remote_secret_filter: Arc<dyn RemoteSecretFilter> = Arc::new(default_remote_secret_filter);

        let lookup = GenericLookup {
            service_provider_type: ServiceProviderType::GitLab,
            token_filter: new_filter(
                factory.configuration.token_match_policy,
                Arc::new(GitlabTokenFilter),
            ),
            remote_secret_filter: Some(remote_secret_filter),
            metadata_provider: Arc::new(GitlabMetadataProvider::new(
                factory.token_storage.clone(),
                client_builder.clone(),
            )),
            metadata_cache: Arc::new(
                factory.new_cache_with_expiration_policy(Arc::new(NeverMetadataExpirationPolicy)),
            ),
            token_storage: factory.token_storage.clone(),
            repo_url_parser: repo_url_from_schemaless_string,
            max_concurrency: factory.configuration.lookup_concurrency,
        };

        let oauth_capability = config
            .oauth2_config
            .as_ref()
            .map(|_| GitlabOAuthCapability::new(factory.configuration.base_url.clone()));

        Ok(Self {
            download_file_capability: GitlabDownloadFileCapability::new(
                client_builder.clone(),
                repo_url_matcher.clone(),
            ),
            base_url,
            lookup,
            http_client: factory.http_client.clone(),
            client_builder,
            repo_url_matcher,
            oauth_capability,
        })
    }

    /// Whether the repository answers an anonymous request
    async fn check_public_repo_access(&self, access_check: &SpiAccessCheck) -> Result<bool> {
        let repo_url = repo_url_from_schemaless_string(&access_check.spec.repo_url)?;
        let response = self.http_client.get(repo_url).send().await.map_err(|e| {
            error!(
                "Failed to request {} to assess if it is public: {}",
                access_check.spec.repo_url, e
            );
            e
        })?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            code => {
                info!(
                    code = code.as_u16(),
                    repo_url = %access_check.spec.repo_url,
                    "unexpected return code for repo"
                );
                Ok(false)
            }
        }
    }

    async fn check_private_repo_access(
        &self,
        store: &dyn ObjectStore,
        access_check: &SpiAccessCheck,
    ) -> SpiAccessCheckStatus {
        let mut status = SpiAccessCheckStatus::unknown(ServiceProviderType::GitLab);

        let (owner, project) = match self
            .repo_url_matcher
            .parse_owner_and_project(&access_check.spec.repo_url)
        {
            Ok(parsed) => parsed,
            Err(e) => return status.with_error(SpiAccessCheckErrorReason::BadUrl, e.to_string()),
        };

        let credentials = match self.lookup.lookup_credentials(store, access_check).await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                debug!("No credentials to check access to {}", access_check.spec.repo_url);
                return status;
            }
            Err(e) => {
                return status.with_error(SpiAccessCheckErrorReason::TokenLookupFailed, e.to_string())
            }
        };

        let client = match self.client_builder.create_authenticated_client(&credentials) {
            Ok(client) => client,
            Err(e) => return status.with_error(SpiAccessCheckErrorReason::UnknownError, e.to_string()),
        };

        match client.get_project(&format!("{owner}/{project}")).await {
            Ok(project) => {
                status.accessible = true;
                // internal projects need a signed-in user, so they aren't public
                if matches!(project.visibility, Visibility::Private | Visibility::Internal) {
                    status.accessibility = SpiAccessCheckAccessibility::Private;
                }
                status
            }
            Err(e) if e.status_code() == Some(404) => {
                status.with_error(SpiAccessCheckErrorReason::RepoNotFound, e.to_string())
            }
            Err(e) => status.with_error(SpiAccessCheckErrorReason::UnknownError, e.to_string()),
        }
    }
}

#[async_trait]
impl ServiceProvider for Gitlab {
    fn provider_type(&self) -> ServiceProviderType {
        ServiceProviderType::GitLab
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

    async fn check_repository_access(
        &self,
        store: &dyn ObjectStore,
        access_check: &SpiAccessCheck,
    ) -> Result<SpiAccessCheckStatus> {
        if self.check_public_repo_access(access_check).await? {
            let mut status = SpiAccessCheckStatus::unknown(ServiceProviderType::GitLab);
            status.accessible = true;
            status.accessibility = SpiAccessCheckAccessibility::Public;
            return Ok(status);
        }

        Ok(self.check_private_repo_access(store, access_check).await)
    }

    fn validate(&self, validated: &dyn Validated) -> ValidationResult {
        scopes::validate(validated)
    }

    fn oauth_capability(&self) -> Option<&dyn OAuthCapability> {
        self.oauth_capability
            .as_ref()
            .map(|c| c as &dyn OAuthCapability)
    }

    fn download_file_capability(&self) -> Option<&dyn DownloadFileCapability> {
        Some(&self.download_file_capability)
    }
}
