// Gunzip relay library
// Turns gzip objects landing in S3 into decompressed siblings and retires the source

pub mod classify;
pub mod config;
pub mod constants;
pub mod decompress;
pub mod error;
pub mod event;
pub mod key;
pub mod logging;
pub mod relay;
pub mod store;
