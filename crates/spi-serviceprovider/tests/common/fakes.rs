//! In-memory collaborators of the lookup

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use spi_core::types::{Matchable, RemoteSecret, SpiAccessToken, TokenMetadata};
use spi_serviceprovider::store::labels_match;
use spi_serviceprovider::{Error, Labels, MetadataProvider, ObjectStore, Result, TokenFilter};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Object store over plain vectors
#[derive(Default)]
pub struct FakeObjectStore {
    tokens: RwLock<Vec<SpiAccessToken>>,
    remote_secrets: Vec<RemoteSecret>,
    secrets: Vec<Secret>,
    fail_listing: AtomicBool,
    status_updates: AtomicUsize,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: SpiAccessToken) -> Self {
        self.tokens.get_mut().push(token);
        self
    }

    pub fn with_remote_secret(mut self, remote_secret: RemoteSecret) -> Self {
        self.remote_secrets.push(remote_secret);
        self
    }

    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.secrets.push(secret);
        self
    }

    /// Every list call fails from now on
    pub fn fail_listing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    pub fn status_updates(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }

    pub async fn token(&self, name: &str) -> Option<SpiAccessToken> {
        self.tokens
            .read()
            .await
            .iter()
            .find(|t| t.name_any() == name)
            .cloned()
    }

    fn check_listing(&self) -> Result<()> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Error::configuration("listing is broken"));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn list_access_tokens(&self, namespace: &str, labels: &Labels) -> Result<Vec<SpiAccessToken>> {
        self.check_listing()?;
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .filter(|t| t.namespace().as_deref() == Some(namespace) && labels_match(labels, t.labels()))
            .cloned()
            .collect())
    }

    async fn list_remote_secrets(&self, namespace: &str, labels: &Labels) -> Result<Vec<RemoteSecret>> {
        self.check_listing()?;
        Ok(self
            .remote_secrets
            .iter()
            .filter(|rs| rs.namespace().as_deref() == Some(namespace) && labels_match(labels, rs.labels()))
            .cloned()
            .collect())
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret> {
        self.secrets
            .iter()
            .find(|s| s.namespace().as_deref() == Some(namespace) && s.name_any() == name)
            .cloned()
            .ok_or_else(|| Error::not_found("Secret", format!("{namespace}/{name}")))
    }

    async fn update_access_token_status(&self, token: &SpiAccessToken) -> Result<()> {
        self.status_updates.fetch_add(1, Ordering::SeqCst);
        let mut tokens = self.tokens.write().await;
        let stored = tokens
            .iter_mut()
            .find(|t| t.name_any() == token.name_any() && t.namespace() == token.namespace())
            .ok_or_else(|| Error::not_found("SPIAccessToken", token.key()))?;
        stored.status = token.status.clone();
        Ok(())
    }
}

/// Metadata provider answering with a fixed username, failing for chosen tokens
#[derive(Default)]
pub struct StaticMetadataProvider {
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, names: &[&str]) -> Self {
        self.failing = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Each fetch takes this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches seen running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StaticMetadataProvider {
    async fn fetch(&self, token: &SpiAccessToken) -> Result<Option<TokenMetadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&token.name_any()) {
            return Err(Error::unexpected_status(401, "https://gitlab.com/api/v4/user"));
        }
        Ok(Some(TokenMetadata {
            username: "alice".to_string(),
            user_id: "42".to_string(),
            ..Default::default()
        }))
    }
}

/// Matches tokens by name, failing for chosen tokens
pub struct NamedTokenFilter {
    matching: HashSet<String>,
    failing: HashSet<String>,
}

impl NamedTokenFilter {
    /// Matches every token
    pub fn all() -> Self {
        Self {
            matching: HashSet::new(),
            failing: HashSet::new(),
        }
    }

    pub fn only(names: &[&str]) -> Self {
        Self {
            matching: names.iter().map(|n| n.to_string()).collect(),
            failing: HashSet::new(),
        }
    }

    pub fn failing_for(mut self, names: &[&str]) -> Self {
        self.failing = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

#[async_trait]
impl TokenFilter for NamedTokenFilter {
    async fn matches(&self, _matchable: &dyn Matchable, token: &SpiAccessToken) -> Result<bool> {
        let name = token.name_any();
        if self.failing.contains(&name) {
            return Err(Error::configuration(format!("cannot match {name}")));
        }
        Ok(self.matching.is_empty() || self.matching.contains(&name))
    }
}
