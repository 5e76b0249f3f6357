//! Persisted artifact metadata.

use crate::ArtifactId;
use autoop_database::Entry;
use autoop_error::{
    AutoopResult, DatabaseError, DatabaseErrorKind, RegistryError, RegistryErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Metadata entry stored in the registry collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ArtifactRecord {
    pub(crate) name: String,
    pub(crate) version: String,
    #[serde(rename = "type")]
    pub(crate) artifact_type: String,
    pub(crate) asset_path: String,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    #[serde(default)]
    pub(crate) metadata: Map<String, JsonValue>,
}

impl ArtifactRecord {
    pub(crate) fn into_entry(self) -> AutoopResult<Entry> {
        match serde_json::to_value(self).map_err(DatabaseError::from)? {
            JsonValue::Object(entry) => Ok(entry),
            other => Err(DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "artifact record serialized to non-object {}",
                other
            )))
            .into()),
        }
    }

    pub(crate) fn from_entry(id: &ArtifactId, entry: Entry) -> AutoopResult<Self> {
        serde_json::from_value(JsonValue::Object(entry)).map_err(|e| {
            RegistryError::new(RegistryErrorKind::Malformed {
                id: id.to_string(),
                reason: e.to_string(),
            })
            .into()
        })
    }
}

/// Registry view of an artifact without its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ArtifactSummary {
    /// Artifact id.
    id: ArtifactId,
    /// Logical artifact name.
    name: String,
    /// Version string.
    version: String,
    /// Type tag.
    #[serde(rename = "type")]
    artifact_type: String,
    /// Storage path of the payload blob.
    asset_path: String,
    /// Free-form labels.
    tags: Vec<String>,
    /// Arbitrary extra metadata.
    metadata: Map<String, JsonValue>,
}

impl ArtifactSummary {
    pub(crate) fn new(id: ArtifactId, record: ArtifactRecord) -> Self {
        Self {
            id,
            name: record.name,
            version: record.version,
            artifact_type: record.artifact_type,
            asset_path: record.asset_path,
            tags: record.tags,
            metadata: record.metadata,
        }
    }
}
