//! RemoteSecret resource
//!
//! A remote secret is reconciled elsewhere into plain secrets delivered to
//! one or more targets. Only the parts needed to find the delivered secret
//! are modelled here.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1beta1",
    kind = "RemoteSecret",
    namespaced,
    status = "RemoteSecretStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSecretSpec {
    #[serde(default)]
    pub secret: LinkableSecretSpec,

    #[serde(default)]
    pub targets: Vec<RemoteSecretTarget>,
}

/// Shape of the secret delivered to targets
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkableSecretSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSecretTarget {
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSecretStatus {
    #[serde(default)]
    pub targets: Vec<TargetStatus>,
}

/// Delivery state of one target
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetStatus {
    /// A target delivered without error to `namespace` of the local cluster
    pub fn is_local_to(&self, namespace: &str) -> bool {
        self.api_url.as_deref().unwrap_or_default().is_empty()
            && self.error.as_deref().unwrap_or_default().is_empty()
            && self.namespace == namespace
    }
}

impl RemoteSecret {
    pub fn targets(&self) -> &[TargetStatus] {
        self.status.as_ref().map(|s| s.targets.as_slice()).unwrap_or_default()
    }

    /// Index of the target delivered to `namespace` in the local cluster
    pub fn local_namespace_target_index(&self, namespace: &str) -> Option<usize> {
        self.targets().iter().position(|t| t.is_local_to(namespace))
    }
}
