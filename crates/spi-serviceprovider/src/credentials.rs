//! Resolved credentials

use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use spi_core::types::{BASIC_AUTH_PASSWORD_KEY, BASIC_AUTH_USERNAME_KEY};
use spi_tokenstorage::{SecureString, TokenData};

use crate::error::{Error, Result};
use crate::store::ObjectStore;

/// Username and token found for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: SecureString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<SecureString>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Credentials from the `username` and `password` keys of a basic-auth secret
    pub fn from_basic_auth_secret(secret: &Secret) -> Self {
        Self {
            username: secret_value(secret, BASIC_AUTH_USERNAME_KEY).unwrap_or_default(),
            token: secret_value(secret, BASIC_AUTH_PASSWORD_KEY)
                .unwrap_or_default()
                .into(),
        }
    }
}

impl From<&TokenData> for Credentials {
    fn from(data: &TokenData) -> Self {
        Self {
            username: data.username.clone(),
            token: data.access_token.clone(),
        }
    }
}

/// Value of a secret key, from `data` or else `stringData`
pub(crate) fn secret_value(secret: &Secret, key: &str) -> Option<String> {
    if let Some(bytes) = secret.data.as_ref().and_then(|d| d.get(key)) {
        return Some(String::from_utf8_lossy(&bytes.0).into_owned());
    }
    secret.string_data.as_ref().and_then(|d| d.get(key)).cloned()
}

fn has_data(secret: &Secret) -> bool {
    secret.data.as_ref().is_some_and(|d| !d.is_empty())
        || secret.string_data.as_ref().is_some_and(|d| !d.is_empty())
}

/// Header name and value authorizing requests with the token in the secret's `password` key
pub async fn auth_header_from_secret(
    store: &dyn ObjectStore,
    namespace: &str,
    name: &str,
) -> Result<(String, String)> {
    let secret = store
        .get_secret(namespace, name)
        .await
        .map_err(|e| Error::get("Secret", format!("{namespace}/{name}"), e))?;

    if !has_data(&secret) {
        return Err(Error::SecretDataEmpty {
            secret: format!("{namespace}/{}", secret.name_any()),
        });
    }

    let token = secret_value(&secret, BASIC_AUTH_PASSWORD_KEY).unwrap_or_default();
    Ok(("Authorization".to_string(), format!("Bearer {token}")))
}
