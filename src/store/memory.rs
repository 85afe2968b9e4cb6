//! In-memory object store (HashMap storage) for tests and dry runs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{ObjectBody, ObjectStore};
use crate::error::RelayError;

/// An object as held by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub content_length: usize,
}

/// One recorded gateway call, in invocation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch { bucket: String, key: String },
    Put { bucket: String, key: String },
    Delete { bucket: String, key: String },
}

type ObjectMap = HashMap<(String, String), StoredObject>;

/// Store that keeps objects in memory and journals every call
///
/// Errors can be injected per operation to exercise failure paths.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<ObjectMap>>,
    calls: Arc<RwLock<Vec<StoreCall>>>,
    fetch_error: Arc<RwLock<Option<RelayError>>>,
    put_error: Arc<RwLock<Option<RelayError>>>,
    delete_error: Arc<RwLock<Option<RelayError>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without journaling a call
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        let body = body.into();
        let object = StoredObject {
            content_length: body.len(),
            body,
            content_type: None,
        };
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), object);
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.get(bucket, key).is_some()
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().clone()
    }

    pub fn put_count(&self) -> usize {
        self.calls
            .read()
            .iter()
            .filter(|c| matches!(c, StoreCall::Put { .. }))
            .count()
    }

    pub fn delete_count(&self) -> usize {
        self.calls
            .read()
            .iter()
            .filter(|c| matches!(c, StoreCall::Delete { .. }))
            .count()
    }

    /// Make every subsequent fetch fail with `error` (None to clear)
    pub fn set_fetch_error(&self, error: Option<RelayError>) {
        *self.fetch_error.write() = error;
    }

    /// Make every subsequent put fail with `error` (None to clear)
    pub fn set_put_error(&self, error: Option<RelayError>) {
        *self.put_error.write() = error;
    }

    /// Make every subsequent delete fail with `error` (None to clear)
    pub fn set_delete_error(&self, error: Option<RelayError>) {
        *self.delete_error.write() = error;
    }

    fn record(&self, call: StoreCall) {
        self.calls.write().push(call);
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody, RelayError> {
        self.record(StoreCall::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(err) = self.fetch_error.read().clone() {
            return Err(err);
        }

        self.get(bucket, key)
            .map(|object| ObjectBody::new(object.body))
            .ok_or_else(|| RelayError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), RelayError> {
        self.record(StoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(err) = self.put_error.read().clone() {
            return Err(err);
        }

        let object = StoredObject {
            content_length: body.len(),
            body,
            content_type: Some(content_type.to_string()),
        };
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), object);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), RelayError> {
        self.record(StoreCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(err) = self.delete_error.read().clone() {
            return Err(err);
        }

        self.objects
            .write()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
