//! Filesystem-backed storage implementation.
//!
//! Logical paths map one-to-one onto files below the base directory, so the
//! tree on disk mirrors the keys callers use.

use crate::{Storage, normalize};
use autoop_error::{AutoopResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

/// Suffix for in-flight writes; such files never show up in `list`.
const PARTIAL_SUFFIX: &str = ".partial";

/// Filesystem storage backend.
///
/// Stores each blob as a regular file at `{base_path}/{logical path}`:
///
/// ```text
/// ./assets/
/// ├── dbo/
/// │   └── artifacts/
/// │       └── ZW5j:1
/// └── objects/
///     └── ZW5j:1
/// ```
///
/// # Features
///
/// - **Root confinement**: `.`/`..` are resolved lexically and escapes are rejected
/// - **Atomic writes**: Uses temp file + rename for atomicity
/// - **Explicit existence checks**: `load`/`delete` report the logical path when absent
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> AutoopResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created local storage");
        Ok(Self { base_path })
    }

    /// Root directory of this backend.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a logical path to its normalized form and absolute location.
    fn resolve(&self, path: &str) -> AutoopResult<(String, PathBuf)> {
        let logical = normalize(path)?;
        let mut full = self.base_path.clone();
        for segment in logical.split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }
        Ok((logical, full))
    }

    /// Like `resolve`, but the root itself is not a valid blob location.
    fn resolve_blob(&self, path: &str) -> AutoopResult<(String, PathBuf)> {
        let (logical, full) = self.resolve(path)?;
        if logical.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(path.to_string())).into());
        }
        Ok((logical, full))
    }

    fn assert_blob_exists(logical: &str, full: &Path) -> AutoopResult<()> {
        if !full.is_file() {
            return Err(StorageError::new(StorageErrorKind::NotFound(logical.to_string())).into());
        }
        Ok(())
    }

    /// Convert an absolute path below the base back into a logical path.
    fn to_logical(&self, full: &Path) -> Option<String> {
        let relative = full.strip_prefix(&self.base_path).ok()?;
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }

    fn is_partial(file_name: &str) -> bool {
        file_name.starts_with('.') && file_name.ends_with(PARTIAL_SUFFIX)
    }
}

impl Storage for LocalStorage {
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    fn save(&self, path: &str, data: &[u8]) -> AutoopResult<()> {
        let (logical, full) = self.resolve_blob(path)?;

        let parent = full.parent().unwrap_or(&self.base_path);
        std::fs::create_dir_all(parent).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;

        // Write to temp file first, then rename for atomicity
        let file_name = full
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("blob");
        let temp_path = parent.join(format!(
            ".{}.{}{}",
            file_name,
            Uuid::new_v4().simple(),
            PARTIAL_SUFFIX
        ));
        std::fs::write(&temp_path, data).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = std::fs::rename(&temp_path, &full) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                full.display(),
                e
            )))
            .into());
        }

        tracing::debug!(path = %logical, size = data.len(), "Saved blob");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn load(&self, path: &str) -> AutoopResult<Vec<u8>> {
        let (logical, full) = self.resolve_blob(path)?;
        Self::assert_blob_exists(&logical, &full)?;

        let data = std::fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(logical.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    full.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %logical, size = data.len(), "Loaded blob");
        Ok(data)
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, path: &str) -> AutoopResult<()> {
        let (logical, full) = self.resolve_blob(path)?;
        Self::assert_blob_exists(&logical, &full)?;

        std::fs::remove_file(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(logical.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    full.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %logical, "Deleted blob");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn list(&self, prefix: &str) -> AutoopResult<Vec<String>> {
        let (logical, full) = self.resolve(prefix)?;

        if full.is_file() {
            return Ok(vec![logical]);
        }
        if !full.is_dir() {
            tracing::debug!(prefix = %logical, "Prefix matches nothing");
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&full).follow_links(false) {
            let entry = entry.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "walk {}: {}",
                    full.display(),
                    e
                )))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_str().is_some_and(Self::is_partial) {
                continue;
            }
            match self.to_logical(entry.path()) {
                Some(path) => paths.push(path),
                None => tracing::warn!(
                    path = %entry.path().display(),
                    "Skipping file with non UTF-8 name"
                ),
            }
        }
        paths.sort();

        tracing::debug!(prefix = %logical, count = paths.len(), "Listed blobs");
        Ok(paths)
    }

    #[tracing::instrument(skip(self))]
    fn exists(&self, path: &str) -> AutoopResult<bool> {
        let (_, full) = self.resolve_blob(path)?;
        Ok(full.is_file())
    }
}
