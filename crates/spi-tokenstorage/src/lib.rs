//! Token storage for service provider integration
//!
//! Access tokens are stored outside of the cluster resources. This crate
//! provides:
//! - **`TokenStorage`**: the get/store/delete contract keyed by the owning `SPIAccessToken`
//! - **`TokenData`**: token material that is zeroed on drop and never printed
//! - **`MemoryTokenStorage`**: an in-process backend

pub mod error;
pub mod memory;
pub mod security;
pub mod types;

pub use error::{Error, Result};
pub use memory::MemoryTokenStorage;
pub use security::SecureString;
pub use types::TokenData;

use async_trait::async_trait;
use spi_core::types::SpiAccessToken;

/// Storage of token data, keyed by the token resource owning it
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Store data for the token, replacing what was there
    async fn store(&self, owner: &SpiAccessToken, data: TokenData) -> Result<()>;

    /// Returns Ok(None) when nothing is stored for the token
    async fn get(&self, owner: &SpiAccessToken) -> Result<Option<TokenData>>;

    async fn delete(&self, owner: &SpiAccessToken) -> Result<()>;
}
