//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, DatabaseErrorKind, RegistryError, RegistryErrorKind, StorageError,
    StorageErrorKind,
};

/// Every error the persistence layer can surface.
///
/// # Examples
///
/// ```
/// use autoop_error::{AutoopError, ConfigError};
///
/// let err: AutoopError = ConfigError::new("bad base path").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AutoopErrorKind {
    /// Storage backend error
    #[from(StorageError)]
    Storage(StorageError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Artifact registry error
    #[from(RegistryError)]
    Registry(RegistryError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// autoop error with kind discrimination.
///
/// The predicates below collapse the nested kinds into the three failure
/// classes callers usually branch on: not found, invalid path, malformed data.
///
/// # Examples
///
/// ```
/// use autoop_error::{AutoopResult, DatabaseError, DatabaseErrorKind};
///
/// fn lookup() -> AutoopResult<()> {
///     Err(DatabaseError::new(DatabaseErrorKind::NotFound {
///         collection: "artifacts".to_string(),
///         id: "missing-id".to_string(),
///     }))?
/// }
///
/// assert!(lookup().unwrap_err().is_not_found());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("autoop Error: {}", _0)]
pub struct AutoopError(Box<AutoopErrorKind>);

impl AutoopError {
    /// Create a new error from a kind.
    pub fn new(kind: AutoopErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AutoopErrorKind {
        &self.0
    }

    /// A path, entry or blob was absent.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            AutoopErrorKind::Storage(e) => matches!(e.kind, StorageErrorKind::NotFound(_)),
            AutoopErrorKind::Database(e) => matches!(e.kind, DatabaseErrorKind::NotFound { .. }),
            _ => false,
        }
    }

    /// A storage path or database key was rejected before any I/O.
    pub fn is_invalid_path(&self) -> bool {
        match self.kind() {
            AutoopErrorKind::Storage(e) => matches!(e.kind, StorageErrorKind::InvalidPath(_)),
            AutoopErrorKind::Database(e) => {
                matches!(e.kind, DatabaseErrorKind::InvalidKey { .. })
            }
            _ => false,
        }
    }

    /// Persisted data could not be decoded.
    pub fn is_malformed(&self) -> bool {
        match self.kind() {
            AutoopErrorKind::Database(e) => matches!(e.kind, DatabaseErrorKind::Malformed { .. }),
            AutoopErrorKind::Registry(e) => matches!(e.kind, RegistryErrorKind::Malformed { .. }),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to AutoopErrorKind
impl<T> From<T> for AutoopError
where
    T: Into<AutoopErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for autoop operations.
pub type AutoopResult<T> = std::result::Result<T, AutoopError>;
