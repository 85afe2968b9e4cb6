//! Gzip decompression stream and bounded draining
//!
//! [`open`] wraps any byte source in a lazy gzip decoder; nothing beyond the
//! header peek is decoded until the caller reads. [`drain`] pulls the whole
//! stream into memory, bounded by a size limit so a small archive cannot
//! expand without bound.

use std::io::{BufRead, BufReader, Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::constants::DRAIN_CHUNK_SIZE;
use crate::error::RelayError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompressed view over a gzip byte source
///
/// Concatenated gzip members are decoded as one continuous stream. Bytes
/// after the last member must start another member, so trailing zero padding
/// (as some tape-style writers emit) is reported as a corrupt stream.
pub struct DecompressionStream<R: Read> {
    inner: MultiGzDecoder<BufReader<R>>,
}

impl<R: Read> Read for DecompressionStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Open a decompression stream over `source`
///
/// Only the gzip magic is checked up front. Truncation and checksum
/// mismatches surface while reading.
///
/// # Errors
///
/// Returns `RelayError::CorruptStream` if the source is empty or does not
/// start with the gzip magic bytes.
pub fn open<R: Read>(source: R) -> Result<DecompressionStream<R>, RelayError> {
    let mut reader = BufReader::with_capacity(DRAIN_CHUNK_SIZE, source);
    let head = reader
        .fill_buf()
        .map_err(|e| RelayError::CorruptStream(format!("failed to read gzip header: {}", e)))?;

    if head.is_empty() {
        return Err(RelayError::CorruptStream("empty payload".to_string()));
    }
    if head.len() >= GZIP_MAGIC.len() && head[..GZIP_MAGIC.len()] != GZIP_MAGIC {
        return Err(RelayError::CorruptStream(
            "invalid gzip header (bad magic bytes)".to_string(),
        ));
    }

    Ok(DecompressionStream {
        inner: MultiGzDecoder::new(reader),
    })
}

/// Read `stream` to the end into a buffer of at most `limit` bytes
///
/// # Errors
///
/// - `RelayError::CorruptStream` if decoding fails mid-stream
/// - `RelayError::PayloadTooLarge` if the output exceeds `limit`
pub fn drain<R: Read>(stream: R, limit: u64) -> Result<Vec<u8>, RelayError> {
    let mut reader = stream.take(limit.saturating_add(1));
    let mut result = Vec::with_capacity(DRAIN_CHUNK_SIZE);
    reader
        .read_to_end(&mut result)
        .map_err(|e| RelayError::CorruptStream(e.to_string()))?;

    if result.len() as u64 > limit {
        return Err(RelayError::PayloadTooLarge { limit });
    }
    Ok(result)
}

/// Decompress an in-memory gzip payload
pub fn decompress(data: &[u8], limit: u64) -> Result<Vec<u8>, RelayError> {
    drain(open(data)?, limit)
}

/// Gzip-compress `data` at the given level (1-9)
pub fn compress(data: &[u8], level: u32) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::new(level));
    encoder.write_all(data)?;
    encoder.finish()
}
