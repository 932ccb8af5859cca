//! Token metadata and matching for GitLab

use async_trait::async_trait;
use spi_core::types::{Matchable, SpiAccessToken, TokenMetadata};
use spi_tokenstorage::TokenStorage;
use std::sync::Arc;
use tracing::debug;

use super::client::GitlabClientBuilder;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::filter::TokenFilter;
use crate::metadata::MetadataProvider;

/// Reads the token's user and scopes from the GitLab API
pub struct GitlabMetadataProvider {
    token_storage: Arc<dyn TokenStorage>,
    client_builder: GitlabClientBuilder,
}

impl GitlabMetadataProvider {
    pub fn new(token_storage: Arc<dyn TokenStorage>, client_builder: GitlabClientBuilder) -> Self {
        Self {
            token_storage,
            client_builder,
        }
    }
}

#[async_trait]
impl MetadataProvider for GitlabMetadataProvider {
    async fn fetch(&self, token: &SpiAccessToken) -> Result<Option<TokenMetadata>> {
        let Some(data) = self.token_storage.get(token).await? else {
            debug!("No data stored for token {}, skipping metadata", token.key());
            return Ok(None);
        };

        let client = self
            .client_builder
            .create_authenticated_client(&Credentials::from(&data))?;
        let user = client.current_user().await?;
        // OAuth tokens have no scopes endpoint
        let scopes = client.current_token_scopes().await?.unwrap_or_default();

        Ok(Some(TokenMetadata {
            username: user.username,
            user_id: user.id.to_string(),
            scopes,
            last_refresh_time: 0,
        }))
    }
}

/// Any GitLab token with metadata matches; the labels already fixed the host
pub struct GitlabTokenFilter;

#[async_trait]
impl TokenFilter for GitlabTokenFilter {
    async fn matches(&self, _matchable: &dyn Matchable, token: &SpiAccessToken) -> Result<bool> {
        Ok(token.token_metadata().is_some())
    }
}
