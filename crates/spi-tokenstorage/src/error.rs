//! Error types for spi-tokenstorage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The token resource has no namespace or name to key the data by
    #[error("token {token} cannot be used as a storage key: {reason}")]
    InvalidKey { token: String, reason: String },

    /// The backend failed
    #[error("token storage backend error: {message}")]
    Backend { message: String },
}

impl Error {
    pub fn invalid_key(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
