//! GitLab token scopes and permission validation

use spi_core::types::{Permission, PermissionArea, Permissions, ServiceProviderType, Validated};

use crate::error::Error;
use crate::oauth::get_all_scopes;
use crate::traits::{OAuthCapability, ValidationResult};

const PROVIDER: &str = "GitLab";

pub const SCOPE_API: &str = "api";
pub const SCOPE_READ_API: &str = "read_api";
pub const SCOPE_READ_USER: &str = "read_user";
pub const SCOPE_READ_REPOSITORY: &str = "read_repository";
pub const SCOPE_WRITE_REPOSITORY: &str = "write_repository";
pub const SCOPE_READ_REGISTRY: &str = "read_registry";
pub const SCOPE_WRITE_REGISTRY: &str = "write_registry";
pub const SCOPE_SUDO: &str = "sudo";
pub const SCOPE_OPENID: &str = "openid";
pub const SCOPE_PROFILE: &str = "profile";
pub const SCOPE_EMAIL: &str = "email";

const ALL_SCOPES: &[&str] = &[
    SCOPE_API,
    SCOPE_READ_API,
    SCOPE_READ_USER,
    SCOPE_READ_REPOSITORY,
    SCOPE_WRITE_REPOSITORY,
    SCOPE_READ_REGISTRY,
    SCOPE_WRITE_REGISTRY,
    SCOPE_SUDO,
    SCOPE_OPENID,
    SCOPE_PROFILE,
    SCOPE_EMAIL,
];

pub fn is_valid_scope(scope: &str) -> bool {
    ALL_SCOPES.contains(&scope)
}

/// GitLab scopes granting the permission
pub fn translate_to_gitlab_scopes(permission: &Permission) -> Vec<String> {
    let write = permission.permission_type.is_write();
    let scope = match permission.area {
        PermissionArea::Repository | PermissionArea::RepositoryMetadata if write => SCOPE_WRITE_REPOSITORY,
        PermissionArea::Repository | PermissionArea::RepositoryMetadata => SCOPE_READ_REPOSITORY,
        PermissionArea::Registry if write => SCOPE_WRITE_REGISTRY,
        PermissionArea::Registry => SCOPE_READ_REGISTRY,
        PermissionArea::User => SCOPE_READ_USER,
        PermissionArea::Webhooks | PermissionArea::RegistryMetadata => return vec![],
    };
    vec![scope.to_string()]
}

/// Report the permissions and scopes GitLab can't grant
pub fn validate(validated: &dyn Validated) -> ValidationResult {
    let permissions = validated.permissions();
    let mut result = ValidationResult::default();

    for p in &permissions.required {
        match p.area {
            PermissionArea::Repository | PermissionArea::RepositoryMetadata | PermissionArea::Registry => {}
            PermissionArea::User => {
                if p.permission_type.is_write() {
                    result.scope_validation.push(Error::UnsupportedPermission {
                        provider: PROVIDER,
                        area: p.area.to_string(),
                    });
                }
            }
            PermissionArea::Webhooks | PermissionArea::RegistryMetadata => {
                result.scope_validation.push(Error::UnsupportedArea {
                    provider: PROVIDER,
                    area: p.area.to_string(),
                });
            }
        }
    }

    for scope in &permissions.additional_scopes {
        if !is_valid_scope(scope) {
            result.scope_validation.push(Error::UnsupportedScope {
                provider: PROVIDER,
                scope: scope.clone(),
            });
        }
    }

    result
}

/// OAuth through the OAuth service, always asking for `read_user`
pub struct GitlabOAuthCapability {
    oauth_service_base_url: String,
}

impl GitlabOAuthCapability {
    pub fn new(oauth_service_base_url: impl Into<String>) -> Self {
        Self {
            oauth_service_base_url: oauth_service_base_url.into(),
        }
    }
}

impl OAuthCapability for GitlabOAuthCapability {
    fn oauth_service_base_url(&self) -> &str {
        &self.oauth_service_base_url
    }

    fn provider_type(&self) -> ServiceProviderType {
        ServiceProviderType::GitLab
    }

    fn oauth_scopes_for(&self, permissions: &Permissions) -> Vec<String> {
        // user metadata is read with every token
        let mut scopes = get_all_scopes(translate_to_gitlab_scopes, permissions);
        if !scopes.iter().any(|s| s == SCOPE_READ_USER) {
            scopes.push(SCOPE_READ_USER.to_string());
        }
        scopes
    }
}
