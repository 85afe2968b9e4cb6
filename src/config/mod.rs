// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_CONTENT_TYPE, DEFAULT_MAX_OBJECT_SIZE_MB, DEFAULT_OUTPUT_SUFFIX, DEFAULT_SOURCE_SUFFIX,
};
use crate::error::RelayError;
use crate::logging::LogFormat;
use crate::relay::FailurePolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelaySettings,
    #[serde(default)]
    pub s3: S3Settings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_source_suffix() -> String {
    DEFAULT_SOURCE_SUFFIX.to_string()
}

fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_max_object_size_mb() -> u64 {
    DEFAULT_MAX_OBJECT_SIZE_MB
}

/// Relay behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Extension (without dot) an object must have to be relayed (default: gz)
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    /// Extension (without dot) of the decompressed object (default: log)
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// MIME type written with the decompressed object (default: text/plain)
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// What a failed record does to the rest of the batch (default: continue)
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Largest decompressed payload held in memory, in MB (default: 512)
    #[serde(default = "default_max_object_size_mb")]
    pub max_object_size_mb: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            source_suffix: default_source_suffix(),
            output_suffix: default_output_suffix(),
            content_type: default_content_type(),
            failure_policy: FailurePolicy::default(),
            max_object_size_mb: default_max_object_size_mb(),
        }
    }
}

impl RelaySettings {
    pub fn max_object_size_bytes(&self) -> u64 {
        self.max_object_size_mb.saturating_mul(1024 * 1024)
    }
}

/// S3 client overrides; unset fields fall back to the AWS default chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, RelayError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| RelayError::Config(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var_name) = missing {
            return Err(RelayError::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        let config: Config =
            serde_yaml::from_str(&substituted).map_err(|e| RelayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RelayError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        let relay = &self.relay;

        for (name, suffix) in [
            ("source_suffix", &relay.source_suffix),
            ("output_suffix", &relay.output_suffix),
        ] {
            if suffix.is_empty() {
                return Err(RelayError::Config(format!("relay.{} cannot be empty", name)));
            }
            if suffix.contains('.') || suffix.contains('/') {
                return Err(RelayError::Config(format!(
                    "relay.{} '{}' must not contain '.' or '/'",
                    name, suffix
                )));
            }
        }

        if relay.source_suffix.eq_ignore_ascii_case(&relay.output_suffix) {
            return Err(RelayError::Config(format!(
                "relay.source_suffix and relay.output_suffix are both '{}'",
                relay.source_suffix
            )));
        }

        if relay.content_type.trim().is_empty() {
            return Err(RelayError::Config(
                "relay.content_type cannot be empty".to_string(),
            ));
        }

        if relay.max_object_size_mb == 0 {
            return Err(RelayError::Config(
                "relay.max_object_size_mb must be greater than 0".to_string(),
            ));
        }

        if let Some(endpoint) = &self.s3.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(RelayError::Config(format!(
                    "s3.endpoint '{}' must start with http:// or https://",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}
