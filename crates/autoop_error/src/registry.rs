//! Artifact registry error types.

/// Artifact registry error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RegistryErrorKind {
    /// Artifact fields cannot produce a valid id or blob path
    #[display("Invalid artifact: {}", _0)]
    InvalidArtifact(String),
    /// Metadata entry is missing fields or has the wrong shape
    #[display("Malformed artifact record {}: {}", id, reason)]
    Malformed {
        /// Artifact id whose record failed to decode
        id: String,
        /// Decoding failure
        reason: String,
    },
}

/// Registry error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Registry Error: {} at line {} in {}", kind, line, file)]
pub struct RegistryError {
    /// Failure category and the artifact it concerns
    pub kind: RegistryErrorKind,
    /// Source line of the registry call that failed
    pub line: u32,
    /// Source file of the registry call that failed
    pub file: &'static str,
}

impl RegistryError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: RegistryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
