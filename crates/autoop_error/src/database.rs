//! Database error types.

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// No cached entry under (collection, id)
    #[display("Entry not found: {}/{}", collection, id)]
    NotFound {
        /// Collection that was searched
        collection: String,
        /// Missing entry id
        id: String,
    },
    /// Collection or id is not usable as a single path segment
    #[display("Invalid key '{}': {}", key, reason)]
    InvalidKey {
        /// Offending collection name or id
        key: String,
        /// Why it was rejected
        reason: String,
    },
    /// A persisted entry could not be parsed
    #[display("Malformed entry at {}: {}", path, reason)]
    Malformed {
        /// Storage path of the entry
        path: String,
        /// Parser or layout failure
        reason: String,
    },
    /// Serialization error
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use autoop_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::NotFound {
///     collection: "artifacts".to_string(),
///     id: "m1".to_string(),
/// });
/// assert!(format!("{}", err).contains("artifacts/m1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// Failure category and the entry it concerns
    pub kind: DatabaseErrorKind,
    /// Source line of the database call that failed
    pub line: u32,
    /// Source file of the database call that failed
    pub file: &'static str,
}

impl DatabaseError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::new(DatabaseErrorKind::Serialization(err.to_string()))
    }
}
