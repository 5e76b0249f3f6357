//! Artifact registry over a database and a storage backend.

use crate::record::ArtifactRecord;
use crate::{Artifact, ArtifactId, ArtifactSummary};
use autoop_database::{Database, Entry, validate_key};
use autoop_error::{
    AutoopResult, RegistryError, RegistryErrorKind, StorageError, StorageErrorKind,
};
use autoop_storage::{Storage, join, normalize};
use std::sync::Arc;

/// Collection holding artifact metadata entries.
pub const DEFAULT_COLLECTION: &str = "artifacts";

/// Storage prefix holding artifact payload blobs.
pub const DEFAULT_OBJECTS_PREFIX: &str = "objects";

/// Catalog of versioned artifacts.
///
/// Metadata lives in a [`Database`] collection, payloads in [`Storage`] under
/// a separate prefix. The registry owns neither; it only sequences calls into
/// them:
///
/// - `register` writes the payload, then the metadata
/// - `get` reads the metadata, then the payload
/// - `delete` removes the metadata, then the payload
///
/// Any missing side is reported as an error rather than skipped.
pub struct ArtifactRegistry {
    database: Arc<Database>,
    storage: Arc<dyn Storage>,
    collection: String,
    objects_prefix: String,
}

impl ArtifactRegistry {
    /// Create a registry using [`DEFAULT_COLLECTION`] and [`DEFAULT_OBJECTS_PREFIX`].
    ///
    /// # Errors
    ///
    /// Fails like [`ArtifactRegistry::with_namespace`] when the default
    /// payload prefix overlaps the database root.
    pub fn new(database: Arc<Database>, storage: Arc<dyn Storage>) -> AutoopResult<Self> {
        Self::with_namespace(database, storage, DEFAULT_COLLECTION, DEFAULT_OBJECTS_PREFIX)
    }

    /// Create a registry with a custom collection and payload prefix.
    ///
    /// Payloads must live outside the database subtree: the prefix may not
    /// equal the database root, sit below it, or contain it. A database
    /// rooted at the storage root therefore cannot host a registry.
    ///
    /// # Errors
    ///
    /// Fails if the collection is not a valid database key, or the prefix is
    /// not a valid storage path or overlaps the database root.
    pub fn with_namespace(
        database: Arc<Database>,
        storage: Arc<dyn Storage>,
        collection: impl Into<String>,
        objects_prefix: impl AsRef<str>,
    ) -> AutoopResult<Self> {
        let collection = collection.into();
        validate_key(&collection)?;
        let objects_prefix = normalize(objects_prefix.as_ref())?;

        if overlaps(&objects_prefix, database.root()) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                "objects prefix '{}' overlaps database root '{}'",
                objects_prefix,
                database.root()
            )))
            .into());
        }

        Ok(Self {
            database,
            storage,
            collection,
            objects_prefix,
        })
    }

    /// Collection holding this registry's metadata.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn asset_path(&self, id: &ArtifactId) -> String {
        join(&[&self.objects_prefix, id.as_str()])
    }

    /// Decode the entry stored under `id` and check it describes `id`.
    ///
    /// The stored name and version must derive `id`, and the stored asset
    /// path must be the one this registry assigns to `id`.
    fn checked_record(&self, id: &ArtifactId, entry: Entry) -> AutoopResult<ArtifactRecord> {
        let record = ArtifactRecord::from_entry(id, entry)?;
        let expected_path = self.asset_path(id);

        let reason = if ArtifactId::from_parts(&record.name, &record.version) != *id {
            Some(format!(
                "record describes {} version {}",
                record.name, record.version
            ))
        } else if record.asset_path != expected_path {
            Some(format!(
                "asset path {} is not {}",
                record.asset_path, expected_path
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(RegistryError::new(RegistryErrorKind::Malformed {
                id: id.to_string(),
                reason,
            })
            .into()),
            None => Ok(record),
        }
    }

    /// Register an artifact, overwriting any previous registration of the
    /// same name and version.
    ///
    /// The payload is saved before the metadata entry.
    #[tracing::instrument(
        skip(self, artifact),
        fields(
            name = %artifact.name(),
            version = %artifact.version(),
            artifact_type = %artifact.artifact_type(),
            size = artifact.data().len()
        )
    )]
    pub fn register(&self, artifact: &Artifact) -> AutoopResult<ArtifactId> {
        let id = artifact.id();
        let asset_path = self.asset_path(&id);

        self.storage.save(&asset_path, artifact.data())?;

        let record = ArtifactRecord {
            name: artifact.name().clone(),
            version: artifact.version().clone(),
            artifact_type: artifact.artifact_type().clone(),
            asset_path,
            tags: artifact.tags().clone(),
            metadata: artifact.metadata().clone(),
        };
        self.database
            .set(&self.collection, id.as_str(), record.into_entry()?)?;

        tracing::info!(id = %id, "Registered artifact");
        Ok(id)
    }

    /// Metadata of a registered artifact, without loading its payload.
    ///
    /// # Errors
    ///
    /// `NotFound` if no metadata is registered under `id`, `Malformed` if
    /// the entry does not decode as an artifact record or describes another
    /// artifact.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub fn summary(&self, id: &ArtifactId) -> AutoopResult<ArtifactSummary> {
        let entry = self.database.get(&self.collection, id.as_str())?;
        let record = self.checked_record(id, entry)?;
        Ok(ArtifactSummary::new(id.clone(), record))
    }

    /// Load a registered artifact with its payload.
    ///
    /// # Errors
    ///
    /// `NotFound` if the metadata is absent, or if the metadata exists but
    /// its payload blob is missing. `Malformed` if the record is unreadable,
    /// its name and version do not derive `id`, or its asset path is not the
    /// one this registry assigns to `id`.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub fn get(&self, id: &ArtifactId) -> AutoopResult<Artifact> {
        let entry = self.database.get(&self.collection, id.as_str())?;
        let record = self.checked_record(id, entry)?;

        let data = self.storage.load(&record.asset_path).inspect_err(|e| {
            if e.is_not_found() {
                tracing::error!(
                    asset_path = %record.asset_path,
                    "Artifact metadata present but payload missing"
                );
            }
        })?;

        tracing::debug!(size = data.len(), "Loaded artifact");
        Ok(Artifact::from_parts(
            record.name,
            record.version,
            record.artifact_type,
            record.tags,
            record.metadata,
            data,
        ))
    }

    /// Summaries of all registered artifacts, in registration order.
    ///
    /// With `artifact_type` set, only artifacts carrying that type tag are
    /// returned.
    ///
    /// # Errors
    ///
    /// `NotFound` if a listed artifact's payload blob is missing, `Malformed`
    /// if an entry does not decode as an artifact record or describes another
    /// artifact.
    #[tracing::instrument(skip(self))]
    pub fn list(&self, artifact_type: Option<&str>) -> AutoopResult<Vec<ArtifactSummary>> {
        let mut summaries = Vec::new();

        for (id, entry) in self.database.list(&self.collection) {
            let id = ArtifactId::from(id);
            let record = self.checked_record(&id, entry)?;
            if artifact_type.is_some_and(|t| t != record.artifact_type) {
                continue;
            }
            if !self.storage.exists(&record.asset_path)? {
                tracing::error!(
                    id = %id,
                    asset_path = %record.asset_path,
                    "Artifact metadata present but payload missing"
                );
                return Err(
                    StorageError::new(StorageErrorKind::NotFound(record.asset_path)).into(),
                );
            }
            summaries.push(ArtifactSummary::new(id, record));
        }

        tracing::debug!(count = summaries.len(), "Listed artifacts");
        Ok(summaries)
    }

    /// Delete a registered artifact.
    ///
    /// The record is checked first and nothing is removed if it does not
    /// describe `id`. Then the metadata entry is removed. If the payload blob
    /// turns out to be missing already, `NotFound` is returned, but the
    /// metadata removal stands.
    ///
    /// # Errors
    ///
    /// `NotFound` if no metadata is registered under `id`, or if the payload
    /// blob was already gone. `Malformed` if the record is unreadable or
    /// does not describe `id`.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub fn delete(&self, id: &ArtifactId) -> AutoopResult<()> {
        let entry = self.database.get(&self.collection, id.as_str())?;
        let record = self.checked_record(id, entry)?;

        self.database.delete(&self.collection, id.as_str())?;

        if let Err(e) = self.storage.delete(&record.asset_path) {
            tracing::warn!(
                asset_path = %record.asset_path,
                error = %e,
                "Artifact metadata deleted but payload removal failed"
            );
            return Err(e);
        }

        tracing::info!("Deleted artifact");
        Ok(())
    }
}

fn overlaps(prefix: &str, root: &str) -> bool {
    fn contains(outer: &str, inner: &str) -> bool {
        outer.is_empty()
            || inner == outer
            || inner
                .strip_prefix(outer)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    contains(root, prefix) || contains(prefix, root)
}
