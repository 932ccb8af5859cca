//! Permission model shared by all service providers

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of access requested on a permission area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PermissionType {
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "w")]
    Write,
    #[serde(rename = "rw")]
    ReadWrite,
}

impl PermissionType {
    pub fn is_read(&self) -> bool {
        matches!(self, PermissionType::Read | PermissionType::ReadWrite)
    }

    pub fn is_write(&self) -> bool {
        matches!(self, PermissionType::Write | PermissionType::ReadWrite)
    }

    /// Whether a grant of `self` covers a request for `requested`
    pub fn satisfies(&self, requested: PermissionType) -> bool {
        (!requested.is_read() || self.is_read()) && (!requested.is_write() || self.is_write())
    }
}

/// The part of a service provider a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum PermissionArea {
    Repository,
    RepositoryMetadata,
    Webhooks,
    User,
    Registry,
    RegistryMetadata,
}

impl std::fmt::Display for PermissionArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionArea::Repository => write!(f, "repository"),
            PermissionArea::RepositoryMetadata => write!(f, "repositoryMetadata"),
            PermissionArea::Webhooks => write!(f, "webhooks"),
            PermissionArea::User => write!(f, "user"),
            PermissionArea::Registry => write!(f, "registry"),
            PermissionArea::RegistryMetadata => write!(f, "registryMetadata"),
        }
    }
}

/// A single (area, type) permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Permission {
    #[serde(rename = "type")]
    pub permission_type: PermissionType,
    pub area: PermissionArea,
}

impl Permission {
    pub fn new(area: PermissionArea, permission_type: PermissionType) -> Self {
        Self {
            permission_type,
            area,
        }
    }
}

/// Permissions requested by a binding or access check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub required: Vec<Permission>,

    /// Provider-specific scopes requested verbatim
    #[serde(default)]
    pub additional_scopes: Vec<String>,
}

impl Permissions {
    /// Whether these permissions grant every required permission of `requested`
    pub fn covers(&self, requested: &Permissions) -> bool {
        requested.required.iter().all(|wanted| {
            self.required
                .iter()
                .any(|held| held.area == wanted.area && held.permission_type.satisfies(wanted.permission_type))
        }) && requested
            .additional_scopes
            .iter()
            .all(|scope| self.additional_scopes.contains(scope))
    }
}
