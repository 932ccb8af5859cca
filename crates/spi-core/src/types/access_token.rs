//! SPIAccessToken resource

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Permissions;

/// A token for a service provider, held in token storage.
///
/// The token secret itself never appears in the resource; only metadata
/// discovered about it does.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1beta1",
    kind = "SPIAccessToken",
    namespaced,
    status = "SpiAccessTokenStatus",
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SpiAccessTokenSpec {
    #[serde(default)]
    pub permissions: Permissions,

    pub service_provider_url: String,
}

/// The `SPIAccessToken` resource
pub type SpiAccessToken = SPIAccessToken;

/// Token lifecycle phase
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum SpiAccessTokenPhase {
    #[default]
    AwaitingTokenData,
    Ready,
    Invalid,
    Error,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpiAccessTokenStatus {
    #[serde(default)]
    pub phase: SpiAccessTokenPhase,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_metadata: Option<TokenMetadata>,
}

/// Service provider metadata of a token, refreshed through the metadata cache
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub scopes: Vec<String>,

    /// Unix timestamp (seconds) of the last refresh
    #[serde(default)]
    pub last_refresh_time: i64,
}

impl SpiAccessToken {
    pub fn phase(&self) -> SpiAccessTokenPhase {
        self.status.as_ref().map(|s| s.phase).unwrap_or_default()
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == SpiAccessTokenPhase::Ready
    }

    pub fn token_metadata(&self) -> Option<&TokenMetadata> {
        self.status.as_ref().and_then(|s| s.token_metadata.as_ref())
    }

    /// `namespace/name`, for log and error messages
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace().unwrap_or_default(), self.name_any())
    }
}
