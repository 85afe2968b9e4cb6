// Loading configuration from YAML files on disk

use std::io::Write;

use gunzip_relay::config::Config;
use gunzip_relay::error::RelayError;
use gunzip_relay::logging::LogFormat;
use gunzip_relay::relay::{FailurePolicy, RelayOptions};
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp config file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write temp config file");
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r#"
relay:
  failure_policy: best_effort
  max_object_size_mb: 16
s3:
  region: us-west-2
logging:
  format: text
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.relay.failure_policy, FailurePolicy::BestEffort);
    assert_eq!(config.s3.region.as_deref(), Some("us-west-2"));
    assert_eq!(config.logging.format, LogFormat::Text);

    let options = RelayOptions::from(&config.relay);
    assert_eq!(options.max_object_size, 16 * 1024 * 1024);
    assert_eq!(options.source_suffix, "gz");
    assert_eq!(options.content_type, "text/plain");
}

#[test]
fn test_missing_file_is_config_error() {
    let result = Config::from_file("/nonexistent/gunzip-relay/config.yaml");
    match result {
        Err(RelayError::Config(msg)) => assert!(msg.contains("Failed to read config file")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let file = write_config("relay: [not, a, mapping");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(RelayError::Config(_))
    ));
}

#[test]
fn test_env_var_in_endpoint() {
    std::env::set_var("GUNZIP_RELAY_FILE_TEST_ENDPOINT", "http://127.0.0.1:4566");
    let file = write_config(
        "s3:\n  endpoint: ${GUNZIP_RELAY_FILE_TEST_ENDPOINT}\n  force_path_style: true\n",
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.s3.endpoint.as_deref(), Some("http://127.0.0.1:4566"));
    assert!(config.s3.force_path_style);
}
