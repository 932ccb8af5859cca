//! Builders for cluster resources used in tests

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::ResourceExt;
use spi_core::types::{
    LinkableSecretSpec, RemoteSecret, RemoteSecretSpec, RemoteSecretStatus, ServiceProviderType,
    SpiAccessCheck, SpiAccessCheckSpec, SpiAccessToken, SpiAccessTokenBinding,
    SpiAccessTokenBindingSpec, SpiAccessTokenPhase, SpiAccessTokenSpec, SpiAccessTokenStatus,
    TargetStatus, TokenMetadata, RS_SERVICE_PROVIDER_HOST_LABEL,
    RS_SERVICE_PROVIDER_REPOSITORY_ANNOTATION, SERVICE_PROVIDER_HOST_LABEL,
    SERVICE_PROVIDER_TYPE_LABEL,
};
use std::collections::BTreeMap;

use super::{GITLAB_HOST, NAMESPACE};

/// Builder for SPIAccessToken resources, a ready GitLab token by default
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    name: String,
    namespace: String,
    provider_type: ServiceProviderType,
    host: String,
    phase: SpiAccessTokenPhase,
    metadata: Option<TokenMetadata>,
}

impl TokenBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: NAMESPACE.to_string(),
            provider_type: ServiceProviderType::GitLab,
            host: GITLAB_HOST.to_string(),
            phase: SpiAccessTokenPhase::Ready,
            metadata: None,
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn provider_type(mut self, provider_type: ServiceProviderType) -> Self {
        self.provider_type = provider_type;
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn phase(mut self, phase: SpiAccessTokenPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Metadata refreshed at `last_refresh_time`
    pub fn metadata(mut self, username: &str, last_refresh_time: i64) -> Self {
        self.metadata = Some(TokenMetadata {
            username: username.to_string(),
            last_refresh_time,
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> SpiAccessToken {
        let mut token = SpiAccessToken::new(
            &self.name,
            SpiAccessTokenSpec {
                service_provider_url: format!("https://{}", self.host),
                ..Default::default()
            },
        );
        token.metadata.namespace = Some(self.namespace);
        token
            .labels_mut()
            .insert(SERVICE_PROVIDER_TYPE_LABEL.to_string(), self.provider_type.as_str().to_string());
        token
            .labels_mut()
            .insert(SERVICE_PROVIDER_HOST_LABEL.to_string(), self.host);
        token.status = Some(SpiAccessTokenStatus {
            phase: self.phase,
            token_metadata: self.metadata,
            ..Default::default()
        });
        token
    }
}

/// Builder for RemoteSecret resources labeled with the GitLab host
#[derive(Debug, Clone)]
pub struct RemoteSecretBuilder {
    name: String,
    host: String,
    repositories: Option<String>,
    secret_type: Option<String>,
    targets: Vec<TargetStatus>,
}

impl RemoteSecretBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            host: GITLAB_HOST.to_string(),
            repositories: None,
            secret_type: None,
            targets: Vec::new(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Comma separated repository paths the secret is scoped to
    pub fn repositories(mut self, repositories: &str) -> Self {
        self.repositories = Some(repositories.to_string());
        self
    }

    pub fn secret_type(mut self, secret_type: &str) -> Self {
        self.secret_type = Some(secret_type.to_string());
        self
    }

    /// Delivered without error to `namespace` of this cluster
    pub fn local_target(mut self, namespace: &str, secret_name: &str) -> Self {
        self.targets.push(TargetStatus {
            namespace: namespace.to_string(),
            api_url: None,
            secret_name: secret_name.to_string(),
            error: None,
        });
        self
    }

    pub fn remote_target(mut self, namespace: &str, api_url: &str) -> Self {
        self.targets.push(TargetStatus {
            namespace: namespace.to_string(),
            api_url: Some(api_url.to_string()),
            secret_name: "remote".to_string(),
            error: None,
        });
        self
    }

    pub fn failed_target(mut self, namespace: &str, error: &str) -> Self {
        self.targets.push(TargetStatus {
            namespace: namespace.to_string(),
            api_url: None,
            secret_name: String::new(),
            error: Some(error.to_string()),
        });
        self
    }

    pub fn build(self) -> RemoteSecret {
        let mut rs = RemoteSecret::new(
            &self.name,
            RemoteSecretSpec {
                secret: LinkableSecretSpec {
                    secret_type: self.secret_type,
                    ..Default::default()
                },
                targets: vec![],
            },
        );
        rs.metadata.namespace = Some(NAMESPACE.to_string());
        rs.labels_mut()
            .insert(RS_SERVICE_PROVIDER_HOST_LABEL.to_string(), self.host);
        if let Some(repositories) = self.repositories {
            rs.annotations_mut()
                .insert(RS_SERVICE_PROVIDER_REPOSITORY_ANNOTATION.to_string(), repositories);
        }
        rs.status = Some(RemoteSecretStatus {
            targets: self.targets,
        });
        rs
    }
}

/// Basic-auth secret in the requesting namespace
pub fn basic_auth_secret(name: &str, username: &str, password: &str) -> Secret {
    let data = BTreeMap::from([
        ("username".to_string(), ByteString(username.as_bytes().to_vec())),
        ("password".to_string(), ByteString(password.as_bytes().to_vec())),
    ]);
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("kubernetes.io/basic-auth".to_string()),
        ..Default::default()
    }
}

pub fn binding(repo_url: &str) -> SpiAccessTokenBinding {
    let mut binding = SpiAccessTokenBinding::new(
        "binding",
        SpiAccessTokenBindingSpec {
            repo_url: repo_url.to_string(),
            permissions: Default::default(),
        },
    );
    binding.metadata.namespace = Some(NAMESPACE.to_string());
    binding
}

pub fn access_check(repo_url: &str) -> SpiAccessCheck {
    let mut check = SpiAccessCheck::new(
        "check",
        SpiAccessCheckSpec {
            repo_url: repo_url.to_string(),
            permissions: Default::default(),
        },
    );
    check.metadata.namespace = Some(NAMESPACE.to_string());
    check
}
