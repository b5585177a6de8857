use std::fs;

use weir_keys::keys::KeyProducer;
use weir_keys::settings::{ConfigError, KeyspaceConfig};

#[test]
fn test_default_config_when_no_path_given() {
    let config = KeyspaceConfig::load(None).unwrap();
    assert_eq!(config.prefix, "runqueue:");
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weir.toml");
    fs::write(&path, "prefix = \"staging:runqueue:\"\n").unwrap();

    let config = KeyspaceConfig::load(Some(&path)).unwrap();
    assert_eq!(config.prefix, "staging:runqueue:");

    let keys = KeyProducer::from_config(&config);
    assert_eq!(keys.prefix(), "staging:runqueue:");
    assert!(keys
        .queue_current_concurrency_scan_pattern()
        .starts_with("staging:runqueue:"));
}

#[test]
fn test_empty_file_falls_back_to_field_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weir.toml");
    fs::write(&path, "").unwrap();

    let config = KeyspaceConfig::load(Some(&path)).unwrap();
    assert_eq!(config.prefix, "runqueue:");
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weir.toml");
    fs::write(&path, "prefix = [not toml").unwrap();

    let err = KeyspaceConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {:?}", err);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let err = KeyspaceConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "got {:?}", err);
}
