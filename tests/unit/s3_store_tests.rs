// S3 gateway error mapping against an unreachable endpoint

use aws_credential_types::Credentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use bytes::Bytes;
use gunzip_relay::error::RelayError;
use gunzip_relay::store::{ObjectStore, S3ObjectStore};

fn unreachable_store() -> S3ObjectStore {
    // Nothing listens on port 1; every request fails at dispatch
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url("http://127.0.0.1:1")
        .force_path_style(true)
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .retry_config(RetryConfig::disabled())
        .build();
    S3ObjectStore::new(aws_sdk_s3::Client::from_conf(config))
}

#[tokio::test]
async fn test_fetch_connection_failure_is_transport_error() {
    let store = unreachable_store();
    let err = store.fetch("bucket", "x/y.gz").await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)), "got {:?}", err);
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_put_connection_failure_is_transport_error() {
    let store = unreachable_store();
    let err = store
        .put("bucket", "x/y.log", Bytes::from_static(b"hello\n"), "text/plain")
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_delete_connection_failure_is_transport_error() {
    let store = unreachable_store();
    let err = store.delete("bucket", "x/y.gz").await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)), "got {:?}", err);
}
