//! Token metadata caching
//!
//! Service providers discover metadata about a token (user, scopes) by
//! calling the provider API with it. The result is kept in the token's
//! status and only refetched once the expiration policy says so.

use async_trait::async_trait;
use chrono::Utc;
use spi_core::types::{SpiAccessToken, TokenMetadata};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::store::ObjectStore;

/// Fetches service provider metadata of a token
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Ok(None) when the token has no data to fetch metadata with
    async fn fetch(&self, token: &SpiAccessToken) -> Result<Option<TokenMetadata>>;
}

/// Decides when cached metadata must be refetched
pub trait MetadataExpirationPolicy: Send + Sync {
    fn is_expired(&self, token: &SpiAccessToken) -> bool;
}

/// Metadata, once fetched, stays valid for the life of the token
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverMetadataExpirationPolicy;

impl MetadataExpirationPolicy for NeverMetadataExpirationPolicy {
    fn is_expired(&self, _token: &SpiAccessToken) -> bool {
        false
    }
}

/// Metadata expires a fixed time after it was last refreshed
#[derive(Debug, Clone, Copy)]
pub struct TtlMetadataExpirationPolicy {
    pub ttl: Duration,
}

impl TtlMetadataExpirationPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl MetadataExpirationPolicy for TtlMetadataExpirationPolicy {
    fn is_expired(&self, token: &SpiAccessToken) -> bool {
        let Some(metadata) = token.token_metadata() else {
            return true;
        };
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        metadata.last_refresh_time.saturating_add(ttl) < Utc::now().timestamp()
    }
}

/// Keeps token metadata in the token status, fresh according to its policy
pub struct MetadataCache {
    store: Arc<dyn ObjectStore>,
    expiration_policy: Arc<dyn MetadataExpirationPolicy>,
}

impl MetadataCache {
    pub fn new(store: Arc<dyn ObjectStore>, expiration_policy: Arc<dyn MetadataExpirationPolicy>) -> Self {
        Self {
            store,
            expiration_policy,
        }
    }

    /// Make sure the token carries metadata that isn't expired, fetching and
    /// persisting it through `provider` if needed.
    pub async fn ensure(&self, token: &mut SpiAccessToken, provider: &dyn MetadataProvider) -> Result<()> {
        if token.token_metadata().is_some() && !self.expiration_policy.is_expired(token) {
            return Ok(());
        }

        debug!("Refreshing metadata of token {}", token.key());
        let metadata = provider.fetch(token).await?.map(|mut m| {
            m.last_refresh_time = Utc::now().timestamp();
            m
        });

        token.status.get_or_insert_with(Default::default).token_metadata = metadata;
        self.persist(token).await
    }

    /// Write the token status, including metadata, back to the store
    pub async fn persist(&self, token: &SpiAccessToken) -> Result<()> {
        self.store.update_access_token_status(token).await
    }
}
