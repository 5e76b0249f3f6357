//! Errors raised by blob storage backends.

/// What went wrong while touching a blob or its directory.
///
/// Every payload is the logical path involved, optionally followed by the
/// underlying I/O reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// A parent directory of a blob, or the backend root, could not be created
    #[display("Cannot create directory for {}", _0)]
    DirectoryCreation(String),
    /// Writing, renaming or unlinking a blob failed
    #[display("Cannot write blob {}", _0)]
    FileWrite(String),
    /// Reading a blob or walking a prefix failed
    #[display("Cannot read blob {}", _0)]
    FileRead(String),
    /// No regular file exists at the logical path
    #[display("Blob not found: {}", _0)]
    NotFound(String),
    /// Logical path is malformed, escapes the root, or collides with another namespace
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
}

/// A [`StorageErrorKind`] tagged with the call site that raised it.
///
/// # Examples
///
/// ```
/// use autoop_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("models/a.bin".to_string()));
/// assert!(err.to_string().contains("Blob not found: models/a.bin"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// Failure category and the path it concerns
    pub kind: StorageErrorKind,
    /// Source line of the backend call that failed
    pub line: u32,
    /// Source file of the backend call that failed
    pub file: &'static str,
}

impl StorageError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
