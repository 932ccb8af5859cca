//! Token material

use crate::security::SecureString;

/// Token data as stored for an `SPIAccessToken`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub username: String,
    pub access_token: SecureString,
    pub token_type: String,
    pub refresh_token: Option<SecureString>,
    /// Unix timestamp (seconds), 0 when the token doesn't expire
    pub expiry: u64,
}

impl TokenData {
    /// Non-expiring bearer token
    pub fn new(username: impl Into<String>, access_token: impl Into<SecureString>) -> Self {
        Self {
            username: username.into(),
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expiry: 0,
        }
    }

    pub fn with_expiry(mut self, expiry: u64) -> Self {
        self.expiry = expiry;
        self
    }
}
