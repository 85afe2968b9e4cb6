//! Object store gateway
//!
//! The relay only needs three operations from the store: fetch a whole
//! object, write a payload with metadata, and delete. [`ObjectStore`] is the
//! seam; [`S3ObjectStore`] talks to S3 and [`InMemoryObjectStore`] backs
//! tests.
//!
//! There is no multi-object transaction. The relay writes the derived object
//! first and retires the source second; a failure in between leaves both.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::{Buf, Bytes};

use crate::error::RelayError;

pub use memory::{InMemoryObjectStore, StoreCall, StoredObject};
pub use s3::S3ObjectStore;

/// Fetched object content
#[derive(Debug, Clone)]
pub struct ObjectBody {
    data: Bytes,
}

impl ObjectBody {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte source for the decompression stream
    pub fn into_reader(self) -> bytes::buf::Reader<Bytes> {
        self.data.reader()
    }
}

impl From<Bytes> for ObjectBody {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

/// Object store operations consumed by the relay
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object
    ///
    /// Fails with `ObjectNotFound` if the key is absent and `Transport` for
    /// connectivity or auth failures.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody, RelayError>;

    /// Write `body` under `key`, overwriting any existing object
    ///
    /// Content length is taken from `body`. Once this returns `Ok` the object
    /// is committed.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), RelayError>;

    /// Remove an object; deleting a missing key succeeds
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), RelayError>;
}
