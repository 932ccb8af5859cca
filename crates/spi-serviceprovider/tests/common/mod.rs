//! Common test infrastructure for spi-serviceprovider tests
//!
//! - `builders`: tokens, remote secrets and secrets with sensible defaults
//! - `fakes`: in-memory object store, metadata providers and token filters
//! - `mock_server`: wiremock endpoints of the GitLab API

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod fakes;
pub mod mock_server;

pub use builders::*;
pub use fakes::*;
pub use mock_server::*;

/// Namespace of the requesting objects
pub const NAMESPACE: &str = "team-a";

pub const GITLAB_HOST: &str = "gitlab.com";

/// Install a test subscriber once, honouring RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
