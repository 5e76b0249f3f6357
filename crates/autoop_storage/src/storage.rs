//! Storage trait definition.

use autoop_error::AutoopResult;

/// Trait for pluggable byte storage backends.
///
/// Paths are logical keys relative to the backend root. Implementations must
/// reject any path that would resolve outside that root with
/// `StorageErrorKind::InvalidPath`, before performing I/O.
pub trait Storage: Send + Sync {
    /// Write `data` at `path`, replacing anything already there.
    ///
    /// Intermediate structure is created as needed. Saving the same bytes
    /// twice leaves the same state as saving them once.
    fn save(&self, path: &str, data: &[u8]) -> AutoopResult<()>;

    /// Read the blob at `path`.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::NotFound` if nothing is stored at `path`.
    fn load(&self, path: &str) -> AutoopResult<Vec<u8>>;

    /// Remove the blob at `path`.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::NotFound` if nothing is stored at `path`.
    fn delete(&self, path: &str) -> AutoopResult<()>;

    /// List every stored path under `prefix`.
    ///
    /// The prefix names a subtree (or a single blob). Order is stable across
    /// calls on unchanged storage. A prefix matching nothing yields an empty
    /// list, not an error.
    fn list(&self, prefix: &str) -> AutoopResult<Vec<String>>;

    /// Check whether a blob is stored at `path`.
    fn exists(&self, path: &str) -> AutoopResult<bool>;
}
