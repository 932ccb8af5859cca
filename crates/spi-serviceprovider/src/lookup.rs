//! Generic token lookup
//!
//! Every service provider finds the tokens matching a request the same way:
//! list the tokens labeled with the provider type and the repository host,
//! refresh the metadata of the ready ones and ask the provider's filter.
//! Credentials fall back to remote secrets when no token matches.

use futures::stream::{self, StreamExt};
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use spi_core::types::{
    comma_separated_values, Matchable, RemoteSecret, ServiceProviderType, SpiAccessToken,
    RS_SERVICE_PROVIDER_HOST_LABEL, RS_SERVICE_PROVIDER_REPOSITORY_ANNOTATION,
    SERVICE_PROVIDER_HOST_LABEL, SERVICE_PROVIDER_TYPE_LABEL,
};
use spi_tokenstorage::TokenStorage;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{AggregateError, Error, Result};
use crate::filter::{RemoteSecretFilter, TokenFilter};
use crate::metadata::{MetadataCache, MetadataProvider};
use crate::store::{Labels, ObjectStore};
use crate::url::{host_label, RepoUrlParser};

/// Token lookup shared by the service providers
///
/// Holds no state between calls besides its collaborators.
pub struct GenericLookup {
    pub service_provider_type: ServiceProviderType,
    pub token_filter: Arc<dyn TokenFilter>,
    /// When None, every remote secret labeled with the host matches
    pub remote_secret_filter: Option<Arc<dyn RemoteSecretFilter>>,
    pub metadata_provider: Arc<dyn MetadataProvider>,
    pub metadata_cache: Arc<MetadataCache>,
    pub token_storage: Arc<dyn TokenStorage>,
    pub repo_url_parser: RepoUrlParser,
    /// Upper bound of candidate tokens evaluated at the same time
    pub max_concurrency: usize,
}

/// Outcomes of the candidate evaluations of one lookup
#[derive(Default)]
struct Accumulator {
    matches: Vec<SpiAccessToken>,
    errors: Vec<Error>,
}

impl GenericLookup {
    /// Tokens in the request's namespace matching the request.
    ///
    /// Fails as a whole with `Error::Aggregate` if evaluating any candidate
    /// failed, even when others matched. Order of the result is unspecified.
    pub async fn lookup(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
    ) -> Result<Vec<SpiAccessToken>> {
        if matchable.obj_namespace().is_empty() {
            return Err(Error::MissingNamespace {
                repo_url: matchable.repo_url().to_string(),
            });
        }
        let repo_url = (self.repo_url_parser)(matchable.repo_url())?;

        let labels = Labels::from([
            (
                SERVICE_PROVIDER_TYPE_LABEL.to_string(),
                self.service_provider_type.as_str().to_string(),
            ),
            (
                SERVICE_PROVIDER_HOST_LABEL.to_string(),
                host_label(matchable.repo_url(), &repo_url),
            ),
        ]);
        let candidates = store
            .list_access_tokens(matchable.obj_namespace(), &labels)
            .await
            .map_err(|e| Error::list("SPIAccessTokens", e))?;

        debug!(
            potential_matches = candidates.len(),
            repo_url = matchable.repo_url(),
            "lookup"
        );

        let ready = candidates.into_iter().filter(|token| {
            let ready = token.is_ready();
            if !ready {
                debug!("Skipping token {} in phase {:?}", token.key(), token.phase());
            }
            ready
        });

        let accumulator = Mutex::new(Accumulator::default());
        stream::iter(ready)
            .for_each_concurrent(self.max_concurrency.max(1), |mut token| {
                let accumulator = &accumulator;
                async move {
                    let outcome = self.evaluate(matchable, &mut token).await;
                    let mut acc = accumulator.lock().await;
                    match outcome {
                        Ok(true) => acc.matches.push(token),
                        Ok(false) => {}
                        Err(e) => {
                            error!("Failed to examine token {}: {}", token.key(), e);
                            acc.errors.push(e);
                        }
                    }
                }
            })
            .await;

        let Accumulator { matches, errors } = accumulator.into_inner();
        if let Some(aggregate) = AggregateError::new(errors) {
            return Err(Error::Aggregate(aggregate));
        }

        debug!(matches = matches.len(), "lookup finished");
        Ok(matches)
    }

    async fn evaluate(&self, matchable: &dyn Matchable, token: &mut SpiAccessToken) -> Result<bool> {
        self.metadata_cache
            .ensure(token, self.metadata_provider.as_ref())
            .await
            .map_err(|e| Error::metadata(token.key(), e))?;

        self.token_filter
            .matches(matchable, token)
            .await
            .map_err(|e| Error::filter(token.key(), e))
    }

    /// Credentials for the request, from a matching token or else a remote secret.
    ///
    /// Ok(None) means no credentials exist for the request.
    pub async fn lookup_credentials(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
    ) -> Result<Option<Credentials>> {
        let tokens = self.lookup(store, matchable).await?;

        // Any match will do, lookup order is not meaningful.
        if let Some(token) = tokens.first() {
            let data = self
                .token_storage
                .get(token)
                .await?
                .ok_or_else(|| Error::TokenDataNotFound { token: token.key() })?;
            return Ok(Some(Credentials::from(&data)));
        }

        let repo_url = (self.repo_url_parser)(matchable.repo_url())?;
        let remote_secrets = self.lookup_remote_secrets(store, matchable, &repo_url).await?;
        let Some(remote_secret) = preferred_remote_secret(&remote_secrets, &repo_url) else {
            debug!(repo_url = matchable.repo_url(), "no credentials found");
            return Ok(None);
        };

        let secret = self
            .lookup_remote_secret_secret(store, matchable, remote_secret)
            .await?;
        Ok(Some(Credentials::from_basic_auth_secret(&secret)))
    }

    /// Refresh and persist the metadata of the token
    pub async fn persist_metadata(&self, token: &mut SpiAccessToken) -> Result<()> {
        self.metadata_cache
            .ensure(token, self.metadata_provider.as_ref())
            .await
    }

    async fn lookup_remote_secrets(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
        repo_url: &Url,
    ) -> Result<Vec<RemoteSecret>> {
        let labels = Labels::from([(
            RS_SERVICE_PROVIDER_HOST_LABEL.to_string(),
            host_label(matchable.repo_url(), repo_url),
        )]);
        let candidates = store
            .list_remote_secrets(matchable.obj_namespace(), &labels)
            .await
            .map_err(|e| Error::list("RemoteSecrets", e))?;

        debug!(potential_matches = candidates.len(), "remote secret lookup");

        let Some(filter) = &self.remote_secret_filter else {
            return Ok(candidates);
        };
        Ok(candidates
            .into_iter()
            .filter(|rs| filter.matches(matchable, rs))
            .collect())
    }

    async fn lookup_remote_secret_secret(
        &self,
        store: &dyn ObjectStore,
        matchable: &dyn Matchable,
        remote_secret: &RemoteSecret,
    ) -> Result<Secret> {
        let namespace = matchable.obj_namespace();
        let target = remote_secret
            .local_namespace_target_index(namespace)
            .map(|i| &remote_secret.targets()[i])
            .ok_or_else(|| Error::MissingTarget {
                remote_secret: remote_secret.name_any(),
                namespace: namespace.to_string(),
            })?;

        store
            .get_secret(namespace, &target.secret_name)
            .await
            .map_err(|e| Error::get("Secret", format!("{namespace}/{}", target.secret_name), e))
    }
}

/// The first remote secret scoped to the repository path, or else the first one
fn preferred_remote_secret<'a>(remote_secrets: &'a [RemoteSecret], repo_url: &Url) -> Option<&'a RemoteSecret> {
    let path = repo_url.path().strip_prefix('/').unwrap_or(repo_url.path());
    remote_secrets
        .iter()
        .find(|rs| {
            rs.annotations()
                .get(RS_SERVICE_PROVIDER_REPOSITORY_ANNOTATION)
                .is_some_and(|repos| comma_separated_values(repos).contains(&path))
        })
        .or_else(|| remote_secrets.first())
}
