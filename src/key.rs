//! Object key decoding and destination key derivation
//!
//! S3 event notifications deliver keys form-encoded: spaces arrive as `+`
//! and everything else non-ASCII arrives percent-encoded. [`decode_key`]
//! turns such a raw key into a [`CanonicalKey`], and [`derive_key`] computes
//! where the decompressed object is written.
//!
//! # Example
//!
//! ```
//! use gunzip_relay::key::{decode_key, derive_key};
//!
//! let key = decode_key("logs/2024/my+app%C3%A9.gz").unwrap();
//! assert_eq!(key.as_str(), "logs/2024/my appé.gz");
//! assert_eq!(derive_key(&key, "gz", "log"), "logs/2024/my appé.log");
//! ```

use std::fmt;

use crate::error::RelayError;

/// Fully decoded object key, free of transport-level escaping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory prefix including the trailing `/`, empty for top-level keys
    pub fn prefix(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..=idx],
            None => "",
        }
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        &self.0[self.prefix().len()..]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decode a raw notification key into its canonical form
///
/// `+` is substituted with a space first, then percent-escapes are decoded as
/// UTF-8. The order matters: an escaped plus (`%2B`) must survive as a literal
/// `+`.
///
/// # Errors
///
/// Returns `RelayError::Decode` for a truncated or non-hex escape, or when the
/// decoded bytes are not valid UTF-8.
pub fn decode_key(raw: &str) -> Result<CanonicalKey, RelayError> {
    let spaced = raw.replace('+', " ");
    validate_escapes(&spaced)?;

    let decoded = urlencoding::decode(&spaced)
        .map_err(|e| RelayError::Decode(format!("key '{}' is not valid UTF-8: {}", raw, e)))?;

    Ok(CanonicalKey(decoded.into_owned()))
}

// urlencoding passes malformed escapes through untouched; reject them instead.
fn validate_escapes(key: &str) -> Result<(), RelayError> {
    let bytes = key.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => {
                    return Err(RelayError::Decode(format!(
                        "malformed percent-escape at byte {} in key '{}'",
                        i, key
                    )))
                }
            }
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Compute the destination key for a decompressed object
///
/// The directory prefix is kept and only the final segment changes: a
/// trailing `.<source_suffix>` (any case) becomes `.<output_suffix>`. A name
/// without that suffix gets `.<output_suffix>` appended.
pub fn derive_key(key: &CanonicalKey, source_suffix: &str, output_suffix: &str) -> String {
    let name = key.file_name();
    let stem = strip_suffix_ignore_case(name, source_suffix).unwrap_or(name);
    format!("{}{}.{}", key.prefix(), stem, output_suffix)
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let tail_len = suffix.len() + 1;
    if name.len() < tail_len {
        return None;
    }
    let split = name.len() - tail_len;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = name.split_at(split);
    let ext = tail.strip_prefix('.')?;
    ext.eq_ignore_ascii_case(suffix).then_some(stem)
}
