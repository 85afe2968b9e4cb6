// Relay behaviour against a mocked object store (transport failures)

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use gunzip_relay::decompress::compress;
use gunzip_relay::error::RelayError;
use gunzip_relay::event::NotificationRecord;
use gunzip_relay::relay::{RecordOutcome, RecordStage, Relay, RelayOptions};
use gunzip_relay::store::{ObjectBody, ObjectStore};
use mockall::mock;

mock! {
    pub Store {}

    #[async_trait]
    impl ObjectStore for Store {
        async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody, RelayError>;
        async fn put(
            &self,
            bucket: &str,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> Result<(), RelayError>;
        async fn delete(&self, bucket: &str, key: &str) -> Result<(), RelayError>;
    }
}

fn gzip_body(data: &[u8]) -> ObjectBody {
    ObjectBody::new(Bytes::from(compress(data, 6).unwrap()))
}

#[tokio::test]
async fn test_put_transport_error_skips_delete() {
    // Test: when the write fails the source must never be deleted
    let mut store = MockStore::new();
    store
        .expect_fetch()
        .times(1)
        .returning(|_, _| Ok(gzip_body(b"hello\n")));
    store
        .expect_put()
        .times(1)
        .returning(|_, _, _, _| Err(RelayError::Transport("503 SlowDown".to_string())));
    store.expect_delete().never();

    let relay = Relay::new(Arc::new(store), RelayOptions::default());
    let outcome = relay
        .process_record(&NotificationRecord::new("bucket", "x/y.gz"))
        .await;

    match outcome {
        RecordOutcome::Failed { stage, error, .. } => {
            assert_eq!(stage, RecordStage::Decompressed);
            assert!(error.is_retriable());
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_transport_error_fails_record() {
    let mut store = MockStore::new();
    store
        .expect_fetch()
        .times(1)
        .returning(|_, _| Err(RelayError::Transport("connection reset".to_string())));
    store.expect_put().never();
    store.expect_delete().never();

    let relay = Relay::new(Arc::new(store), RelayOptions::default());
    let outcome = relay
        .process_record(&NotificationRecord::new("bucket", "x/y.gz"))
        .await;

    assert!(matches!(
        outcome,
        RecordOutcome::Failed {
            stage: RecordStage::Classified,
            error: RelayError::Transport(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_put_receives_decompressed_body_and_metadata() {
    let mut store = MockStore::new();
    store
        .expect_fetch()
        .times(1)
        .returning(|_, _| Ok(gzip_body(b"payload")));
    store
        .expect_put()
        .times(1)
        .withf(|bucket, key, body, content_type| {
            bucket == "bucket"
                && key == "x/y.log"
                && &body[..] == b"payload"
                && content_type == "text/plain"
        })
        .returning(|_, _, _, _| Ok(()));
    store
        .expect_delete()
        .withf(|bucket, key| bucket == "bucket" && key == "x/y.gz")
        .times(1)
        .returning(|_, _| Ok(()));

    let relay = Relay::new(Arc::new(store), RelayOptions::default());
    let outcome = relay
        .process_record(&NotificationRecord::new("bucket", "x/y.gz"))
        .await;

    assert!(outcome.is_relayed());
}
