//! Tests for the artifact registry.

use autoop_database::Database;
use autoop_registry::{Artifact, ArtifactId, ArtifactRegistry};
use autoop_storage::{LocalStorage, Storage};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    storage: Arc<dyn Storage>,
    database: Arc<Database>,
    registry: ArtifactRegistry,
}

fn setup() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(temp_dir.path()).unwrap());
    let database = Arc::new(Database::with_root(storage.clone(), "dbo").unwrap());
    let registry = ArtifactRegistry::new(database.clone(), storage.clone()).unwrap();
    Fixture {
        _temp_dir: temp_dir,
        storage,
        database,
        registry,
    }
}

fn artifact(name: &str, version: &str, artifact_type: &str, data: &[u8]) -> Artifact {
    let mut metadata = serde_json::Map::new();
    metadata.insert("rows".to_string(), json!(150));
    Artifact::builder()
        .name(name)
        .version(version)
        .artifact_type(artifact_type)
        .tags(vec!["test".to_string()])
        .metadata(metadata)
        .data(data.to_vec())
        .build()
        .unwrap()
}

#[test]
fn test_register_then_get_roundtrip() {
    let fx = setup();
    let payload = [0u8, 159, 146, 150, 255];
    let encoder = artifact("enc", "1", "OneHotEncoder", &payload);

    let id = fx.registry.register(&encoder).unwrap();

    assert_eq!(id, encoder.id());
    let loaded = fx.registry.get(&id).unwrap();
    assert_eq!(loaded, encoder);
    assert_eq!(loaded.data().as_slice(), payload);
}

#[test]
fn test_register_writes_blob_and_metadata() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();

    let asset_path = format!("objects/{}", id);
    assert_eq!(fx.storage.load(&asset_path).unwrap(), b"blob");

    let entry = fx.database.get("artifacts", id.as_str()).unwrap();
    assert_eq!(entry["name"], json!("enc"));
    assert_eq!(entry["version"], json!("1"));
    assert_eq!(entry["type"], json!("OneHotEncoder"));
    assert_eq!(entry["asset_path"], json!(asset_path));
    assert_eq!(entry["metadata"]["rows"], json!(150));
}

#[test]
fn test_reregister_overwrites() {
    let fx = setup();
    let first = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"old"))
        .unwrap();
    let second = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"new"))
        .unwrap();

    assert_eq!(first, second);
    let listed = fx.registry.list(None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), &first);
    assert_eq!(fx.registry.get(&first).unwrap().data(), b"new");
}

#[test]
fn test_distinct_versions_are_distinct_artifacts() {
    let fx = setup();
    let v1 = fx
        .registry
        .register(&artifact("iris", "1.0.0", "dataset", b"a"))
        .unwrap();
    let v2 = fx
        .registry
        .register(&artifact("iris", "1.0.1", "dataset", b"b"))
        .unwrap();

    assert_ne!(v1, v2);
    assert_eq!(fx.registry.list(None).unwrap().len(), 2);
}

#[test]
fn test_list_filters_by_type_in_registration_order() {
    let fx = setup();
    fx.registry
        .register(&artifact("iris", "1", "dataset", b"csv"))
        .unwrap();
    fx.registry
        .register(&artifact("pipeline_config", "1", "pipeline", b"cfg"))
        .unwrap();
    fx.registry
        .register(&artifact("wine", "1", "dataset", b"csv"))
        .unwrap();

    let datasets: Vec<_> = fx
        .registry
        .list(Some("dataset"))
        .unwrap()
        .into_iter()
        .map(|s| s.name().clone())
        .collect();
    assert_eq!(datasets, vec!["iris", "wine"]);

    let pipelines = fx.registry.list(Some("pipeline")).unwrap();
    assert_eq!(pipelines.len(), 1);
    assert_eq!(pipelines[0].artifact_type(), "pipeline");

    assert!(fx.registry.list(Some("model")).unwrap().is_empty());
    assert_eq!(fx.registry.list(None).unwrap().len(), 3);
}

#[test]
fn test_summary_does_not_need_payload() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();

    let summary = fx.registry.summary(&id).unwrap();

    assert_eq!(summary.name(), "enc");
    assert_eq!(summary.tags(), &vec!["test".to_string()]);
    assert_eq!(summary.asset_path(), &format!("objects/{}", id));
}

#[test]
fn test_get_unknown_is_not_found() {
    let fx = setup();

    let err = fx.registry.get(&ArtifactId::from("bm9wZQ:1")).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_get_with_missing_blob_is_not_found() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();
    fx.storage.delete(&format!("objects/{}", id)).unwrap();

    assert!(fx.registry.get(&id).unwrap_err().is_not_found());
    assert!(fx.registry.list(None).unwrap_err().is_not_found());
}

#[test]
fn test_get_with_malformed_record() {
    let fx = setup();
    let mut entry = serde_json::Map::new();
    entry.insert("name".to_string(), json!("enc"));
    fx.database.set("artifacts", "ZW5j:1", entry).unwrap();

    let err = fx.registry.get(&ArtifactId::from("ZW5j:1")).unwrap_err();

    assert!(err.is_malformed());
}

#[test]
fn test_get_rejects_record_for_other_artifact() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();
    let entry = fx.database.get("artifacts", id.as_str()).unwrap();
    fx.database.set("artifacts", "Zm9v:2", entry).unwrap();

    assert!(
        fx.registry
            .get(&ArtifactId::from("Zm9v:2"))
            .unwrap_err()
            .is_malformed()
    );
}

#[test]
fn test_delete_removes_metadata_and_blob() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();

    fx.registry.delete(&id).unwrap();

    assert!(fx.registry.get(&id).unwrap_err().is_not_found());
    assert!(!fx.storage.exists(&format!("objects/{}", id)).unwrap());
    assert!(fx.registry.list(None).unwrap().is_empty());
    assert!(fx.registry.delete(&id).unwrap_err().is_not_found());
}

#[test]
fn test_delete_with_missing_blob_still_removes_metadata() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();
    fx.storage.delete(&format!("objects/{}", id)).unwrap();

    assert!(fx.registry.delete(&id).unwrap_err().is_not_found());

    assert!(!fx.database.contains("artifacts", id.as_str()));
    assert!(fx.registry.list(None).unwrap().is_empty());
}

#[test]
fn test_registrations_survive_reopen() {
    let fx = setup();
    let id = fx
        .registry
        .register(&artifact("enc", "1", "OneHotEncoder", b"blob"))
        .unwrap();

    let database = Arc::new(Database::with_root(fx.storage.clone(), "dbo").unwrap());
    let reopened = ArtifactRegistry::new(database, fx.storage.clone()).unwrap();

    assert_eq!(reopened.get(&id).unwrap().data(), b"blob");
}

#[test]
fn test_custom_namespace() {
    let fx = setup();
    let registry = ArtifactRegistry::with_namespace(
        fx.database.clone(),
        fx.storage.clone(),
        "models",
        "payloads/models",
    )
    .unwrap();

    let id = registry
        .register(&artifact("knn", "1", "model", b"weights"))
        .unwrap();

    assert_eq!(registry.collection(), "models");
    assert!(fx.storage.exists(&format!("payloads/models/{}", id)).unwrap());
    assert!(fx.registry.list(None).unwrap().is_empty());

    assert!(
        ArtifactRegistry::with_namespace(fx.database.clone(), fx.storage.clone(), "a/b", "x")
            .is_err()
    );
    assert!(
        ArtifactRegistry::with_namespace(fx.database.clone(), fx.storage.clone(), "ok", "../x")
            .is_err()
    );
}

#[test]
fn test_builder_validation() {
    assert!(
        Artifact::builder()
            .name("enc")
            .artifact_type("OneHotEncoder")
            .build()
            .is_err()
    );
    assert!(
        Artifact::builder()
            .name("")
            .version("1")
            .artifact_type("OneHotEncoder")
            .build()
            .is_err()
    );
    assert!(
        Artifact::builder()
            .name("enc")
            .version("../../etc")
            .artifact_type("OneHotEncoder")
            .build()
            .is_err()
    );
    assert!(
        Artifact::builder()
            .name("enc")
            .version("1")
            .artifact_type("")
            .build()
            .is_err()
    );
}

#[test]
fn test_objects_prefix_must_stay_outside_database_root() {
    let fx = setup();
    let namespace = |prefix: &str| {
        ArtifactRegistry::with_namespace(
            fx.database.clone(),
            fx.storage.clone(),
            "artifacts",
            prefix,
        )
    };

    // Same subtree as the database
    assert!(namespace("dbo").err().unwrap().is_invalid_path());
    assert!(namespace("./dbo/").err().unwrap().is_invalid_path());
    // Inside the database subtree
    assert!(namespace("dbo/artifacts").err().unwrap().is_invalid_path());
    // Enclosing the database subtree
    assert!(namespace("").err().unwrap().is_invalid_path());

    // Sharing a name prefix is not nesting
    assert!(namespace("dbo-objects").is_ok());
    assert!(namespace("objects/dbo").is_ok());
}

#[test]
fn test_nested_database_root_rejects_enclosing_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(temp_dir.path()).unwrap());
    let database = Arc::new(Database::with_root(storage.clone(), "meta/db").unwrap());

    let err = ArtifactRegistry::with_namespace(database.clone(), storage.clone(), "a", "meta")
        .err()
        .unwrap();
    assert!(err.is_invalid_path());

    assert!(
        ArtifactRegistry::with_namespace(database, storage, "a", "meta/objects").is_ok()
    );
}

#[test]
fn test_database_at_storage_root_cannot_host_registry() {
    let temp_dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(temp_dir.path()).unwrap());
    let database = Arc::new(Database::new(storage.clone()).unwrap());

    let err = ArtifactRegistry::new(database, storage).err().unwrap();

    assert!(err.is_invalid_path());
}

#[test]
fn test_record_with_foreign_asset_path_is_malformed() {
    let fx = setup();
    let victim = fx
        .registry
        .register(&artifact("victim", "1", "model", b"victim"))
        .unwrap();
    let other = fx
        .registry
        .register(&artifact("other", "1", "model", b"other"))
        .unwrap();

    let mut entry = fx.database.get("artifacts", other.as_str()).unwrap();
    entry.insert(
        "asset_path".to_string(),
        json!(format!("dbo/artifacts/{}", victim)),
    );
    fx.database.set("artifacts", other.as_str(), entry).unwrap();

    assert!(fx.registry.get(&other).unwrap_err().is_malformed());
    assert!(fx.registry.summary(&other).unwrap_err().is_malformed());
    assert!(fx.registry.list(None).unwrap_err().is_malformed());
    assert!(fx.registry.delete(&other).unwrap_err().is_malformed());

    // Nothing was removed on either side
    assert!(fx.database.contains("artifacts", other.as_str()));
    assert!(fx.storage.exists(&format!("objects/{}", other)).unwrap());
    fx.database.refresh().unwrap();
    assert!(fx.database.contains("artifacts", victim.as_str()));
    assert_eq!(fx.registry.get(&victim).unwrap().data(), b"victim");
}
