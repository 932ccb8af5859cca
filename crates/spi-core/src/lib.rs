//! # spi-core
//!
//! Core library for service provider integration providing:
//! - Custom resource types for access tokens, bindings, access checks and remote secrets
//! - Permission model shared by every service provider
//! - The `Matchable` / `Validated` request descriptors used by token lookup
//! - Operator configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use config::{OAuth2Config, OperatorConfiguration, ServiceProviderConfiguration, TokenMatchPolicy};
pub use error::{Error, Result};
pub use types::{Matchable, Validated};
