// Constants module - centralized default values for configuration
//
// Defaults used by the relay, the config layer and the CLI live here so the
// YAML defaults and the programmatic defaults cannot drift apart.

// =============================================================================
// Relay defaults
// =============================================================================

/// Default compression suffix an object key must carry to be relayed
pub const DEFAULT_SOURCE_SUFFIX: &str = "gz";

/// Default suffix given to the decompressed object
pub const DEFAULT_OUTPUT_SUFFIX: &str = "log";

/// Default MIME type written with the decompressed object
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Default upper bound for one decompressed payload in megabytes
pub const DEFAULT_MAX_OBJECT_SIZE_MB: u64 = 512;

/// Read buffer used when draining the decompression stream
pub const DRAIN_CHUNK_SIZE: usize = 8 * 1024;

/// Compression level used by `decompress::compress`
pub const DEFAULT_GZIP_LEVEL: u32 = 6;

// =============================================================================
// Invocation status strings
// =============================================================================

/// Status reported when the batch completed without a fatal error
pub const STATUS_OK: &str = "Ok";

/// Status reported when the invocation failed
pub const STATUS_FAILED: &str = "Failed";

// =============================================================================
// Logging defaults
// =============================================================================

/// Filter directive used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
