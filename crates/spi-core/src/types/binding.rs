//! SPIAccessTokenBinding resource

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Matchable, Permissions, Validated};

/// Request to bind a matching access token into a secret
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1beta1",
    kind = "SPIAccessTokenBinding",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SpiAccessTokenBindingSpec {
    pub repo_url: String,

    #[serde(default)]
    pub permissions: Permissions,
}

/// The `SPIAccessTokenBinding` resource
pub type SpiAccessTokenBinding = SPIAccessTokenBinding;

impl Matchable for SpiAccessTokenBinding {
    fn repo_url(&self) -> &str {
        &self.spec.repo_url
    }

    fn obj_namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    fn permissions(&self) -> &Permissions {
        &self.spec.permissions
    }
}

impl Validated for SpiAccessTokenBinding {
    fn permissions(&self) -> &Permissions {
        &self.spec.permissions
    }
}
