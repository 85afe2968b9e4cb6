// Error types module

use thiserror::Error;

/// Centralized error type for the relay
///
/// Every failure a record can hit maps onto one of these variants. Only
/// `Transport` is worth retrying, and the relay leaves that to whoever
/// re-delivers the notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Raw object key is not valid percent-encoded UTF-8
    #[error("Key decode error: {0}")]
    Decode(String),

    /// Payload is not valid data for the configured codec
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    /// Decompressed payload exceeds the configured single-buffer limit
    #[error("Decompressed payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    /// Source object does not exist
    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Connectivity, auth or throttling failure talking to the store
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification payload could not be parsed
    #[error("Event error: {0}")]
    Event(String),
}

impl RelayError {
    /// Whether re-running the same record could succeed
    pub fn is_retriable(&self) -> bool {
        matches!(self, RelayError::Transport(_))
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Event(err.to_string())
    }
}
