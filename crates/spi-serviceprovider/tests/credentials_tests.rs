//! Tests for authorization headers built from secrets

mod common;

use common::*;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use spi_serviceprovider::{auth_header_from_secret, ErrorKind};

#[tokio::test]
async fn test_bearer_header_from_password() {
    init_tracing();
    let store = FakeObjectStore::new().with_secret(basic_auth_secret("git-creds", "alice", "glpat-pw"));

    let (name, value) = auth_header_from_secret(&store, NAMESPACE, "git-creds")
        .await
        .unwrap();

    assert_eq!(name, "Authorization");
    assert_eq!(value, "Bearer glpat-pw");
}

#[tokio::test]
async fn test_empty_secret() {
    init_tracing();
    let empty = Secret {
        metadata: ObjectMeta {
            name: Some("empty".to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let store = FakeObjectStore::new().with_secret(empty);

    let err = auth_header_from_secret(&store, NAMESPACE, "empty")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SecretDataEmpty);
    assert_eq!(err.to_string(), "secret team-a/empty has no data");
}

#[tokio::test]
async fn test_missing_secret() {
    init_tracing();
    let store = FakeObjectStore::new();

    let err = auth_header_from_secret(&store, NAMESPACE, "missing")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Get);
    assert!(err.to_string().starts_with("unable to get Secret team-a/missing"));
}
