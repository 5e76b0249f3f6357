//! Tests for configuration loading.

use autoop::{AutoopConfig, DatabaseConfig, RegistryConfig, StorageConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("autoop.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_bundled_defaults_match_default_impl() {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("autoop.toml");

    let config = AutoopConfig::from_file(bundled).unwrap();

    assert_eq!(config, AutoopConfig::default());
    assert_eq!(config.storage().base_path(), Path::new("./assets"));
    assert_eq!(config.database().root(), "dbo");
    assert_eq!(config.registry().collection(), "artifacts");
    assert_eq!(config.registry().objects_prefix(), "objects");
}

#[test]
fn test_from_file_full() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[storage]
base_path = "/srv/autoop"

[database]
root = "metadata"

[registry]
collection = "models"
objects_prefix = "payloads/models"
"#,
    );

    let config = AutoopConfig::from_file(&path).unwrap();

    assert_eq!(config.storage().base_path(), Path::new("/srv/autoop"));
    assert_eq!(config.database().root(), "metadata");
    assert_eq!(config.registry(), &RegistryConfig::new("models", "payloads/models"));
}

#[test]
fn test_from_file_partial_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[registry]
collection = "models"
"#,
    );

    let config = AutoopConfig::from_file(&path).unwrap();

    assert_eq!(config.storage(), &StorageConfig::default());
    assert_eq!(config.database(), &DatabaseConfig::default());
    assert_eq!(config.registry().collection(), "models");
    assert_eq!(config.registry().objects_prefix(), "objects");
}

#[test]
fn test_from_file_serialized_config() {
    let temp_dir = TempDir::new().unwrap();
    let original = AutoopConfig::builder()
        .storage(StorageConfig::new(temp_dir.path()))
        .database(DatabaseConfig::new("db"))
        .build()
        .unwrap();
    let path = write_config(&temp_dir, &toml::to_string(&original).unwrap());

    assert_eq!(AutoopConfig::from_file(&path).unwrap(), original);
}

#[test]
fn test_from_file_missing_is_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = AutoopConfig::from_file(temp_dir.path().join("absent.toml"));

    assert!(result.is_err());
}

#[test]
fn test_from_file_invalid_toml_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[storage\nbase_path = ");

    assert!(AutoopConfig::from_file(&path).is_err());
}

#[test]
fn test_builder_defaults() {
    let config = AutoopConfig::builder().build().unwrap();

    assert_eq!(config, AutoopConfig::default());
}
