//! Write-through database over a storage backend.

use crate::collection::Collection;
use crate::{Entry, validate_key};
use autoop_error::{AutoopResult, DatabaseError, DatabaseErrorKind};
use autoop_storage::{Storage, join, normalize};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Key-value collections cached in memory and persisted one entry per blob.
///
/// Every mutation goes to storage before it lands in the cache, so the cache
/// never holds an entry that failed to persist. Reads are served from the
/// cache only: files changed behind the database's back are picked up by
/// [`Database::refresh`], nothing else.
///
/// The cache sits behind a lock so a `Database` can be shared through an
/// `Arc`, but sequences of calls are not atomic with respect to each other.
pub struct Database {
    storage: Arc<dyn Storage>,
    root: String,
    cache: RwLock<HashMap<String, Collection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open a database that owns the whole storage namespace.
    ///
    /// Loads whatever is already persisted.
    ///
    /// # Errors
    ///
    /// Fails if an existing entry cannot be read or parsed.
    pub fn new(storage: Arc<dyn Storage>) -> AutoopResult<Self> {
        Self::with_root(storage, "")
    }

    /// Open a database whose entries live under `root` inside `storage`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a valid storage path, or if an existing entry
    /// cannot be read or parsed.
    #[tracing::instrument(skip(storage, root))]
    pub fn with_root(storage: Arc<dyn Storage>, root: impl AsRef<str>) -> AutoopResult<Self> {
        let root = normalize(root.as_ref())?;

        let db = Self {
            storage,
            root,
            cache: RwLock::new(HashMap::new()),
        };
        db.refresh()?;

        tracing::info!(root = %db.root, "Opened database");
        Ok(db)
    }

    /// Storage prefix holding this database's entries.
    pub fn root(&self) -> &str {
        &self.root
    }

    fn entry_path(&self, collection: &str, id: &str) -> String {
        join(&[&self.root, collection, id])
    }

    #[track_caller]
    fn not_found(collection: &str, id: &str) -> DatabaseError {
        DatabaseError::new(DatabaseErrorKind::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    /// Store `entry` under `(collection, id)`, overwriting any previous entry.
    ///
    /// The entry is written to storage immediately.
    #[tracing::instrument(skip(self, entry), fields(fields = entry.len()))]
    pub fn set(&self, collection: &str, id: &str, entry: Entry) -> AutoopResult<()> {
        validate_key(collection)?;
        validate_key(id)?;

        let data = serde_json::to_vec_pretty(&entry).map_err(DatabaseError::from)?;
        self.storage.save(&self.entry_path(collection, id), &data)?;

        self.cache
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), entry);

        tracing::info!(collection, id, "Stored entry");
        Ok(())
    }

    /// Fetch the cached entry under `(collection, id)`.
    ///
    /// # Errors
    ///
    /// `DatabaseErrorKind::NotFound` if the cache holds no such entry.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, collection: &str, id: &str) -> AutoopResult<Entry> {
        validate_key(collection)?;
        validate_key(id)?;

        let cache = self.cache.read();
        let entry = cache
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .ok_or_else(|| Self::not_found(collection, id))?;

        tracing::debug!(collection, id, "Cache hit");
        Ok(entry)
    }

    /// Whether `(collection, id)` is cached.
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.cache
            .read()
            .get(collection)
            .is_some_and(|c| c.contains(id))
    }

    /// All cached entries of `collection`, in insertion order.
    ///
    /// An unknown collection yields an empty list.
    #[tracing::instrument(skip(self))]
    pub fn list(&self, collection: &str) -> Vec<(String, Entry)> {
        let cache = self.cache.read();
        let entries: Vec<_> = cache
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, entry)| (id.clone(), entry.clone()))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(collection, count = entries.len(), "Listed entries");
        entries
    }

    /// Names of all collections holding at least one entry, sorted.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<_> = self.cache.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove `(collection, id)` from the cache and from storage.
    ///
    /// Deleting twice is an error, not a no-op.
    ///
    /// # Errors
    ///
    /// `DatabaseErrorKind::NotFound` if the entry is not cached. If the
    /// entry is cached but its file has already vanished, the cache entry is
    /// dropped and the storage `NotFound` is returned.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, collection: &str, id: &str) -> AutoopResult<()> {
        validate_key(collection)?;
        validate_key(id)?;

        if !self.contains(collection, id) {
            return Err(Self::not_found(collection, id).into());
        }

        if let Err(e) = self.storage.delete(&self.entry_path(collection, id)) {
            if !e.is_not_found() {
                return Err(e);
            }
            tracing::warn!(collection, id, "Entry file already gone, dropping cached entry");
            self.evict(collection, id);
            return Err(e);
        }

        self.evict(collection, id);
        tracing::info!(collection, id, "Deleted entry");
        Ok(())
    }

    fn evict(&self, collection: &str, id: &str) {
        let mut cache = self.cache.write();
        if let Some(c) = cache.get_mut(collection) {
            c.remove(id);
            if c.is_empty() {
                cache.remove(collection);
            }
        }
    }

    /// Rebuild the cache from storage.
    ///
    /// Afterwards the cache holds exactly the entries persisted under the
    /// database root. Entries that were already cached keep their relative
    /// order; newly discovered ones are appended in storage listing order.
    /// On error the previous cache is left untouched.
    ///
    /// # Errors
    ///
    /// `DatabaseErrorKind::Malformed` if a file is not laid out as
    /// `{root}/{collection}/{id}` or does not hold a JSON object.
    #[tracing::instrument(skip(self), fields(root = %self.root))]
    pub fn refresh(&self) -> AutoopResult<()> {
        let mut listing = Vec::new();
        let mut loaded: HashMap<String, HashMap<String, Entry>> = HashMap::new();

        for path in self.storage.list(&self.root)? {
            let (collection, id) = self.split_entry_path(&path)?;
            let data = self.storage.load(&path)?;
            let entry: Entry = serde_json::from_slice(&data).map_err(|e| {
                DatabaseError::new(DatabaseErrorKind::Malformed {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            })?;

            loaded
                .entry(collection.clone())
                .or_default()
                .insert(id.clone(), entry);
            listing.push((collection, id));
        }

        let mut cache = self.cache.write();
        let mut fresh: HashMap<String, Collection> = HashMap::new();

        for (collection, previous) in cache.iter() {
            for id in previous.ids() {
                if let Some(entry) = loaded.get_mut(collection).and_then(|m| m.remove(id)) {
                    fresh
                        .entry(collection.clone())
                        .or_default()
                        .insert(id.clone(), entry);
                }
            }
        }
        for (collection, id) in listing {
            if let Some(entry) = loaded.get_mut(&collection).and_then(|m| m.remove(&id)) {
                fresh.entry(collection).or_default().insert(id, entry);
            }
        }

        let before: usize = cache.values().map(Collection::len).sum();
        let after: usize = fresh.values().map(Collection::len).sum();
        *cache = fresh;

        tracing::info!(before, after, "Refreshed database cache");
        Ok(())
    }

    /// Split `{root}/{collection}/{id}` into its key parts.
    fn split_entry_path(&self, path: &str) -> AutoopResult<(String, String)> {
        let relative = if self.root.is_empty() {
            Some(path)
        } else {
            path.strip_prefix(self.root.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        };

        let parts: Option<Vec<&str>> = relative.map(|r| r.split('/').collect());
        match parts.as_deref() {
            Some([collection, id]) if validate_key(collection).is_ok() && validate_key(id).is_ok() => {
                Ok((collection.to_string(), id.to_string()))
            }
            _ => Err(DatabaseError::new(DatabaseErrorKind::Malformed {
                path: path.to_string(),
                reason: "expected {collection}/{id} below the database root".to_string(),
            })
            .into()),
        }
    }
}
