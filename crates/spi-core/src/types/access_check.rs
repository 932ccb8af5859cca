//! SPIAccessCheck resource and its classification status

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Matchable, Permissions, ServiceProviderType, Validated};

/// Request to find out whether a repository is accessible
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1beta1",
    kind = "SPIAccessCheck",
    namespaced,
    status = "SpiAccessCheckStatus",
    printcolumn = r#"{"name":"Accessible","type":"boolean","jsonPath":".status.accessible"}"#,
    printcolumn = r#"{"name":"Accessibility","type":"string","jsonPath":".status.accessibility"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SpiAccessCheckSpec {
    pub repo_url: String,

    #[serde(default)]
    pub permissions: Permissions,
}

/// The `SPIAccessCheck` resource
pub type SpiAccessCheck = SPIAccessCheck;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpiRepoType {
    #[default]
    Git,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpiAccessCheckAccessibility {
    #[default]
    Unknown,
    Public,
    Private,
}

/// Why an access check could not classify a repository
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpiAccessCheckErrorReason {
    RepoNotFound,
    #[serde(rename = "badURL")]
    BadUrl,
    TokenLookupFailed,
    UnknownError,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpiAccessCheckStatus {
    #[serde(default)]
    pub accessible: bool,

    #[serde(default)]
    pub repo_type: SpiRepoType,

    pub service_provider: ServiceProviderType,

    #[serde(default)]
    pub accessibility: SpiAccessCheckAccessibility,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<SpiAccessCheckErrorReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SpiAccessCheckStatus {
    /// Fresh status for a git repository hosted by `service_provider`
    pub fn unknown(service_provider: ServiceProviderType) -> Self {
        Self {
            accessible: false,
            repo_type: SpiRepoType::Git,
            service_provider,
            accessibility: SpiAccessCheckAccessibility::Unknown,
            error_reason: None,
            error_message: None,
        }
    }

    /// Record a classification failure
    pub fn with_error(mut self, reason: SpiAccessCheckErrorReason, message: impl Into<String>) -> Self {
        self.error_reason = Some(reason);
        self.error_message = Some(message.into());
        self
    }
}

impl Matchable for SpiAccessCheck {
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

impl Validated for SpiAccessCheck {
    fn permissions(&self) -> &Permissions {
        &self.spec.permissions
    }
}
