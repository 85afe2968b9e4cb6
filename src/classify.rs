//! Extension-based eligibility check for incoming objects

use crate::constants::DEFAULT_SOURCE_SUFFIX;
use crate::key::CanonicalKey;

/// Result of inspecting a key's extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Extension matches the configured compression suffix
    Eligible,
    /// Final path segment has no `.` (or the key names a directory)
    MissingExtension,
    /// Extension present but not the compression suffix (lower-cased)
    WrongExtension(String),
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Classification::Eligible)
    }

    /// Human-readable reason for a skip, `None` when eligible
    pub fn skip_reason(&self) -> Option<String> {
        match self {
            Classification::Eligible => None,
            Classification::MissingExtension => Some("no file extension".to_string()),
            Classification::WrongExtension(ext) => Some(format!("extension '{}'", ext)),
        }
    }
}

/// Decides whether an object is a compressed payload this relay handles
#[derive(Debug, Clone)]
pub struct FormatClassifier {
    suffix: String,
}

impl Default for FormatClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_SUFFIX)
    }
}

impl FormatClassifier {
    /// Create a classifier for the given suffix (without the leading dot)
    ///
    /// Matching folds ASCII case only, the same rule the derived key uses.
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_ascii_lowercase(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Classify a key by the text after the last `.` of its final segment
    pub fn classify(&self, key: &CanonicalKey) -> Classification {
        let classification = match key.file_name().rsplit_once('.') {
            None => Classification::MissingExtension,
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                if ext == self.suffix {
                    Classification::Eligible
                } else {
                    Classification::WrongExtension(ext)
                }
            }
        };

        if let Some(reason) = classification.skip_reason() {
            tracing::info!(key = %key, reason = %reason, "Skipping non-compressed object");
        }

        classification
    }

    pub fn is_eligible(&self, key: &CanonicalKey) -> bool {
        self.classify(key).is_eligible()
    }
}
