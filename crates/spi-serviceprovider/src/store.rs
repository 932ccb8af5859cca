//! Access to cluster resources
//!
//! Lookup only lists and gets resources (and writes back token metadata);
//! `ObjectStore` is that surface, `KubeObjectStore` backs it with the
//! Kubernetes API.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::{Client, ResourceExt};
use spi_core::types::{RemoteSecret, SpiAccessToken};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Exact-match label requirements
pub type Labels = BTreeMap<String, String>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_access_tokens(&self, namespace: &str, labels: &Labels) -> Result<Vec<SpiAccessToken>>;

    async fn list_remote_secrets(&self, namespace: &str, labels: &Labels) -> Result<Vec<RemoteSecret>>;

    /// Fails with `ErrorKind::NotFound` when the secret doesn't exist
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret>;

    /// Persist the status of the token, in particular its metadata
    async fn update_access_token_status(&self, token: &SpiAccessToken) -> Result<()>;
}

/// Render labels as a label selector, `k1=v1,k2=v2`
pub fn label_selector(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether `object_labels` satisfy every required label
pub fn labels_match(required: &Labels, object_labels: &BTreeMap<String, String>) -> bool {
    required
        .iter()
        .all(|(k, v)| object_labels.get(k).is_some_and(|actual| actual == v))
}

const FIELD_MANAGER: &str = "spi-serviceprovider";

/// Object store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeObjectStore {
    client: Client,
}

impl KubeObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the ambient kubeconfig or in-cluster configuration
    pub async fn try_default() -> Result<Self> {
        Ok(Self::new(Client::try_default().await?))
    }
}

#[async_trait]
impl ObjectStore for KubeObjectStore {
    async fn list_access_tokens(&self, namespace: &str, labels: &Labels) -> Result<Vec<SpiAccessToken>> {
        let api: Api<SpiAccessToken> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().labels(&label_selector(labels));
        Ok(api.list(&params).await?.items)
    }

    async fn list_remote_secrets(&self, namespace: &str, labels: &Labels) -> Result<Vec<RemoteSecret>> {
        let api: Api<RemoteSecret> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().labels(&label_selector(labels));
        Ok(api.list(&params).await?.items)
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(secret) => Ok(secret),
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                Err(Error::not_found("Secret", format!("{namespace}/{name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_access_token_status(&self, token: &SpiAccessToken) -> Result<()> {
        let namespace = token.namespace().unwrap_or_default();
        let api: Api<SpiAccessToken> = Api::namespaced(self.client.clone(), &namespace);
        let patch = serde_json::json!({ "status": token.status });
        api.patch_status(
            &token.name_any(),
            &PatchParams::apply(FIELD_MANAGER),
            &Patch::Merge(&patch),
        )
        .await?;
        debug!("Persisted status of token {}", token.key());
        Ok(())
    }
}
