//! Service provider capability traits

use async_trait::async_trait;
use spi_core::types::{
    Matchable, Permissions, ServiceProviderType, SpiAccessCheck, SpiAccessCheckStatus,
    SpiAccessToken, SpiAccessTokenBinding, Validated,
};
use spi_tokenstorage::{SecureString, TokenData};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::store::ObjectStore;

/// Integration with one service provider instance (a type at a base URL)
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    fn provider_type(&self) -> ServiceProviderType;

    /// Base URL the provider was configured with
    fn base_url(&self) -> &str;

    /// Tokens matching the binding
    async fn lookup_tokens(
        &self,
        store: &dyn ObjectStore,
        binding: &SpiAccessTokenBinding,
    ) -> Result<Vec<SpiAccessToken>>;

    /// Credentials for the request, Ok(None) when there are none
    async fn lookup_credentials(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
    ) -> Result<Option<Credentials>>;

    /// Refresh the metadata of the token and persist it in its status
    async fn persist_metadata(&self, token: &mut SpiAccessToken) -> Result<()>;

    /// Classify the accessibility of the repository of the access check.
    ///
    /// Classification failures are reported in the returned status.
    async fn check_repository_access(
        &self,
        store: &dyn ObjectStore,
        access_check: &SpiAccessCheck,
    ) -> Result<SpiAccessCheckStatus>;

    /// Values exposed through the secret a token is bound into
    fn map_token(
        &self,
        _binding: &SpiAccessTokenBinding,
        token: &SpiAccessToken,
        data: &TokenData,
    ) -> AccessTokenMapper {
        AccessTokenMapper::new(token, data)
    }

    /// Check the requested permissions against what the provider supports
    fn validate(&self, validated: &dyn Validated) -> ValidationResult;

    fn oauth_capability(&self) -> Option<&dyn OAuthCapability> {
        None
    }

    fn download_file_capability(&self) -> Option<&dyn DownloadFileCapability> {
        None
    }
}

/// Problems found with requested permissions
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub scope_validation: Vec<Error>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.scope_validation.is_empty()
    }
}

/// Providers whose tokens can be obtained through the OAuth service
pub trait OAuthCapability: Send + Sync {
    /// Base URL of the OAuth service
    fn oauth_service_base_url(&self) -> &str;

    fn provider_type(&self) -> ServiceProviderType;

    /// OAuth scopes to request for the permissions
    fn oauth_scopes_for(&self, permissions: &Permissions) -> Vec<String>;

    /// Where users start authenticating with this provider
    fn oauth_endpoint(&self) -> String {
        format!(
            "{}/{}/authenticate",
            self.oauth_service_base_url().trim_end_matches('/'),
            self.provider_type().as_str().to_lowercase()
        )
    }
}

/// Providers able to fetch single files from repositories
#[async_trait]
pub trait DownloadFileCapability: Send + Sync {
    /// Contents of `filepath` at `git_ref` (the default branch when empty)
    async fn download_file(
        &self,
        repo_url: &str,
        filepath: &str,
        git_ref: &str,
        credentials: &Credentials,
        max_file_size: u64,
    ) -> Result<String>;
}

/// Token values exposed to bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessTokenMapper {
    pub name: String,
    pub token: SecureString,
    pub service_provider_url: String,
    pub service_provider_user_name: String,
    pub service_provider_user_id: String,
    pub user_id: String,
    pub expired_after: Option<u64>,
    pub scopes: Vec<String>,
}

impl AccessTokenMapper {
    pub fn new(token: &SpiAccessToken, data: &TokenData) -> Self {
        let metadata = token.token_metadata();
        Self {
            name: kube::ResourceExt::name_any(token),
            token: data.access_token.clone(),
            service_provider_url: token.spec.service_provider_url.clone(),
            service_provider_user_name: metadata.map(|m| m.username.clone()).unwrap_or_default(),
            service_provider_user_id: metadata.map(|m| m.user_id.clone()).unwrap_or_default(),
            user_id: String::new(),
            expired_after: (data.expiry > 0).then_some(data.expiry),
            scopes: metadata.map(|m| m.scopes.clone()).unwrap_or_default(),
        }
    }
}
