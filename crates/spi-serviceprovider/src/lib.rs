//! Service provider integration
//!
//! Finds the stored credentials matching a repository and talks to the
//! service providers about them:
//!
//! - **`GenericLookup`**: token and remote secret lookup shared by all providers
//! - **`ServiceProvider`**: the capability set of one provider instance
//! - **`Factory`**: builds providers from the operator configuration
//! - **GitLab**: access checks, scope validation, token metadata and file download
//! - **Host credentials**: plain credentials for hosts without a dedicated provider

pub mod credentials;
pub mod error;
pub mod factory;
pub mod filter;
pub mod gitlab;
pub mod hostcredentials;
pub mod lookup;
pub mod metadata;
pub mod oauth;
pub mod store;
pub mod traits;
pub mod url;

pub use credentials::{auth_header_from_secret, Credentials};
pub use error::{AggregateError, Error, ErrorKind, Result};
pub use factory::Factory;
pub use filter::{default_remote_secret_filter, new_filter, RemoteSecretFilter, TokenFilter, TokenFilterFn};
pub use lookup::GenericLookup;
pub use metadata::{
    MetadataCache, MetadataExpirationPolicy, MetadataProvider, NeverMetadataExpirationPolicy,
    TtlMetadataExpirationPolicy,
};
pub use store::{KubeObjectStore, Labels, ObjectStore};
pub use traits::{
    AccessTokenMapper, DownloadFileCapability, OAuthCapability, ServiceProvider, ValidationResult,
};
pub use self::url::{repo_url_from_schemaless_string, repo_url_from_string, RepoUrlParser};
