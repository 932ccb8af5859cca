//! In-memory token storage

use async_trait::async_trait;
use spi_core::types::SpiAccessToken;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::TokenData;
use crate::TokenStorage;

/// Token storage keeping everything in process memory.
///
/// Data is lost on restart; values are zeroed when removed or dropped.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    tokens: RwLock<HashMap<String, TokenData>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn store(&self, owner: &SpiAccessToken, data: TokenData) -> Result<()> {
        let key = storage_key(owner)?;
        debug!("Storing token data for {}", key);
        self.tokens.write().await.insert(key, data);
        Ok(())
    }

    async fn get(&self, owner: &SpiAccessToken) -> Result<Option<TokenData>> {
        let key = storage_key(owner)?;
        Ok(self.tokens.read().await.get(&key).cloned())
    }

    async fn delete(&self, owner: &SpiAccessToken) -> Result<()> {
        let key = storage_key(owner)?;
        if self.tokens.write().await.remove(&key).is_some() {
            debug!("Deleted token data for {}", key);
        }
        Ok(())
    }
}

/// `namespace/name` of the owning token
fn storage_key(owner: &SpiAccessToken) -> Result<String> {
    let namespace = owner.metadata.namespace.as_deref().unwrap_or_default();
    let name = owner.metadata.name.as_deref().unwrap_or_default();
    if namespace.is_empty() || name.is_empty() {
        return Err(Error::invalid_key(
            format!("{namespace}/{name}"),
            "namespace and name are required",
        ));
    }
    Ok(format!("{namespace}/{name}"))
}
