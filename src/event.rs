//! S3 event notifications
//!
//! Only the fields the relay reads are modelled. Anything else in the payload
//! is ignored.

use serde::Deserialize;

use crate::error::RelayError;

/// One object change, as delivered by the notification source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub bucket: String,
    /// Key exactly as delivered: form-encoded, `+` for spaces
    pub raw_key: String,
    pub event_name: Option<String>,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, raw_key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            raw_key: raw_key.into(),
            event_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

impl S3Event {
    pub fn from_json(json: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Flatten into notification records, preserving delivery order
    pub fn into_records(self) -> Vec<NotificationRecord> {
        self.records
            .into_iter()
            .map(|record| NotificationRecord {
                bucket: record.s3.bucket.name,
                raw_key: record.s3.object.key,
                event_name: record.event_name,
            })
            .collect()
    }
}
