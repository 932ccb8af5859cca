//! Token and remote secret filters

use async_trait::async_trait;
use spi_core::types::{Matchable, RemoteSecret, SpiAccessToken, SECRET_TYPE_BASIC_AUTH};
use spi_core::TokenMatchPolicy;
use std::sync::Arc;

use crate::error::Result;

/// Decides whether a token, with its metadata already refreshed, matches a request
#[async_trait]
pub trait TokenFilter: Send + Sync {
    async fn matches(&self, matchable: &dyn Matchable, token: &SpiAccessToken) -> Result<bool>;
}

/// Token filter from a plain function
pub struct TokenFilterFn<F>(F);

impl<F> TokenFilterFn<F>
where
    F: Fn(&dyn Matchable, &SpiAccessToken) -> Result<bool> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> TokenFilter for TokenFilterFn<F>
where
    F: Fn(&dyn Matchable, &SpiAccessToken) -> Result<bool> + Send + Sync,
{
    async fn matches(&self, matchable: &dyn Matchable, token: &SpiAccessToken) -> Result<bool> {
        (self.0)(matchable, token)
    }
}

/// Decides whether a remote secret matches a request
pub trait RemoteSecretFilter: Send + Sync {
    fn matches(&self, matchable: &dyn Matchable, remote_secret: &RemoteSecret) -> bool;
}

impl<F> RemoteSecretFilter for F
where
    F: Fn(&dyn Matchable, &RemoteSecret) -> bool + Send + Sync,
{
    fn matches(&self, matchable: &dyn Matchable, remote_secret: &RemoteSecret) -> bool {
        self(matchable, remote_secret)
    }
}

/// Accepts remote secrets delivering basic-auth secrets, or not declaring a type
pub fn default_remote_secret_filter(_matchable: &dyn Matchable, remote_secret: &RemoteSecret) -> bool {
    remote_secret
        .spec
        .secret
        .secret_type
        .as_deref()
        .is_none_or(|t| t.is_empty() || t == SECRET_TYPE_BASIC_AUTH)
}

/// Wrap a provider filter according to the configured match policy
pub fn new_filter(policy: TokenMatchPolicy, filter: Arc<dyn TokenFilter>) -> Arc<dyn TokenFilter> {
    match policy {
        TokenMatchPolicy::Any => filter,
        TokenMatchPolicy::Exact => Arc::new(ExactPermissionsFilter { inner: filter }),
    }
}

/// Requires the token to declare the permissions of the request before asking `inner`
struct ExactPermissionsFilter {
    inner: Arc<dyn TokenFilter>,
}

#[async_trait]
impl TokenFilter for ExactPermissionsFilter {
    async fn matches(&self, matchable: &dyn Matchable, token: &SpiAccessToken) -> Result<bool> {
        if !token.spec.permissions.covers(matchable.permissions()) {
            return Ok(false);
        }
        self.inner.matches(matchable, token).await
    }
}
