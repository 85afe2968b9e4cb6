//! Decompress-relay orchestration
//!
//! For each notification record the relay decodes the key, checks the
//! extension, fetches the object, decompresses it into memory, writes the
//! result under the derived key and finally deletes the source:
//!
//! ```text
//! decode key -> classify -> fetch -> decompress -> write -> delete
//! ```
//!
//! Any step can fail the record. The chain above describes the pipeline, not
//! the failure stages: a failed record reports the last [`RecordStage`] it
//! completed. Records run sequentially in delivery order, and a skipped record
//! never affects the ones after it. What a failed record does to the rest of
//! the batch is decided by [`FailurePolicy`].
//!
//! The derived object is always written before the source is deleted. If the
//! delete fails the record is reported as failed at [`RecordStage::Written`]
//! and both objects remain; re-delivery overwrites the derived object with the
//! same content and retries the delete.

pub mod outcome;

use std::sync::Arc;

use bytes::Bytes;
use tracing::Instrument;

use crate::classify::FormatClassifier;
use crate::config::RelaySettings;
use crate::constants::{
    DEFAULT_CONTENT_TYPE, DEFAULT_MAX_OBJECT_SIZE_MB, DEFAULT_OUTPUT_SUFFIX, DEFAULT_SOURCE_SUFFIX,
};
use crate::decompress;
use crate::error::RelayError;
use crate::event::NotificationRecord;
use crate::key::{decode_key, derive_key, CanonicalKey};
use crate::store::ObjectStore;

pub use outcome::{BatchReport, FailurePolicy, InvocationStatus, RecordOutcome, RecordStage};

/// Tunables for one relay instance
#[derive(Debug, Clone)]
pub struct RelayOptions {
    pub source_suffix: String,
    pub output_suffix: String,
    pub content_type: String,
    pub failure_policy: FailurePolicy,
    /// Upper bound for one decompressed payload in bytes
    pub max_object_size: u64,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            failure_policy: FailurePolicy::default(),
            max_object_size: DEFAULT_MAX_OBJECT_SIZE_MB * 1024 * 1024,
        }
    }
}

impl From<&RelaySettings> for RelayOptions {
    fn from(settings: &RelaySettings) -> Self {
        Self {
            source_suffix: settings.source_suffix.clone(),
            output_suffix: settings.output_suffix.clone(),
            content_type: settings.content_type.clone(),
            failure_policy: settings.failure_policy,
            max_object_size: settings.max_object_size_bytes(),
        }
    }
}

/// Drives records through the relay against an injected store
pub struct Relay {
    store: Arc<dyn ObjectStore>,
    classifier: FormatClassifier,
    options: RelayOptions,
}

impl Relay {
    pub fn new(store: Arc<dyn ObjectStore>, options: RelayOptions) -> Self {
        Self {
            classifier: FormatClassifier::new(&options.source_suffix),
            store,
            options,
        }
    }

    /// Process every record of one notification batch in order
    pub async fn process_batch(&self, records: &[NotificationRecord]) -> BatchReport {
        let policy = self.options.failure_policy;
        let mut report = BatchReport::new(policy, records.len());

        for (index, record) in records.iter().enumerate() {
            let outcome = self.process_record(record).await;
            let failed = outcome.is_failed();
            report.push(outcome);

            if failed && policy == FailurePolicy::Abort {
                tracing::warn!(
                    remaining = records.len() - index - 1,
                    "Aborting batch after failed record"
                );
                break;
            }
        }

        tracing::info!(
            records = report.total_records(),
            relayed = report.relayed(),
            skipped = report.skipped(),
            failed = report.failed(),
            not_attempted = report.not_attempted(),
            status = %report.status(),
            "Batch complete"
        );

        report
    }

    /// Process one record to completion
    pub async fn process_record(&self, record: &NotificationRecord) -> RecordOutcome {
        let span = tracing::info_span!(
            "record",
            bucket = %record.bucket,
            event = record.event_name.as_deref().unwrap_or("unknown"),
        );
        self.process_record_inner(record).instrument(span).await
    }

    async fn process_record_inner(&self, record: &NotificationRecord) -> RecordOutcome {
        let bucket = record.bucket.as_str();

        let key = match decode_key(&record.raw_key) {
            Ok(key) => key,
            Err(error) => {
                return failed(bucket, &record.raw_key, RecordStage::Received, error);
            }
        };

        if let Some(reason) = self.classifier.classify(&key).skip_reason() {
            return RecordOutcome::Skipped {
                bucket: bucket.to_string(),
                key: key.into_string(),
                reason,
            };
        }

        let destination =
            derive_key(&key, &self.options.source_suffix, &self.options.output_suffix);
        if destination == key.as_str() {
            let error = RelayError::Config(format!(
                "derived key equals source key '{}'",
                destination
            ));
            return failed(bucket, key.as_str(), RecordStage::Classified, error);
        }

        let mut stage = RecordStage::Classified;
        match self.relay(bucket, &key, &destination, &mut stage).await {
            Ok(bytes) => {
                tracing::info!(key = %key, destination = %destination, bytes, "Relay complete");
                RecordOutcome::Relayed {
                    bucket: bucket.to_string(),
                    source_key: key.into_string(),
                    destination_key: destination,
                    bytes,
                }
            }
            Err(error) => failed(bucket, key.as_str(), stage, error),
        }
    }

    /// Fetch, decompress, write, delete; `stage` tracks the last completed step
    async fn relay(
        &self,
        bucket: &str,
        key: &CanonicalKey,
        destination: &str,
        stage: &mut RecordStage,
    ) -> Result<usize, RelayError> {
        tracing::info!(key = %key, "Extracting gzip object");
        let body = self.store.fetch(bucket, key.as_str()).await?;
        *stage = RecordStage::Fetched;

        let stream = decompress::open(body.into_reader())?;
        let payload = decompress::drain(stream, self.options.max_object_size)?;
        *stage = RecordStage::Decompressed;

        let bytes = payload.len();
        tracing::info!(destination = %destination, bytes, "Writing extracted bytes");
        self.store
            .put(
                bucket,
                destination,
                Bytes::from(payload),
                &self.options.content_type,
            )
            .await?;
        *stage = RecordStage::Written;

        tracing::info!(key = %key, "Deleting source object");
        self.store.delete(bucket, key.as_str()).await?;
        *stage = RecordStage::Deleted;

        Ok(bytes)
    }
}

fn failed(bucket: &str, key: &str, stage: RecordStage, error: RelayError) -> RecordOutcome {
    if stage == RecordStage::Written {
        tracing::error!(
            key = %key,
            stage = %stage,
            error = %error,
            "Derived object written but source not deleted; both objects remain"
        );
    } else {
        tracing::error!(key = %key, stage = %stage, error = %error, "Record failed");
    }

    RecordOutcome::Failed {
        bucket: bucket.to_string(),
        key: key.to_string(),
        stage,
        error,
    }
}
