//! Artifact identifiers.

use autoop_database::validate_key;
use autoop_error::{AutoopResult, RegistryError, RegistryErrorKind};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Identifier of a registered artifact.
///
/// Derived from name and version as `{base64url(name)}:{version}`, so
/// registering the same name and version again addresses the same entry.
///
/// ```
/// use autoop_registry::ArtifactId;
///
/// let id = ArtifactId::derive("enc", "1").unwrap();
/// assert_eq!(id.as_str(), "ZW5j:1");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Derive the id for `(name, version)`.
    ///
    /// # Errors
    ///
    /// `RegistryErrorKind::InvalidArtifact` if the name is empty or the
    /// version cannot be used as a single path segment.
    pub fn derive(name: &str, version: &str) -> AutoopResult<Self> {
        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if let Err(e) = validate_key(version) {
            return Err(invalid(format!("version '{}' rejected: {}", version, e)));
        }
        Ok(Self::from_parts(name, version))
    }

    /// Id for parts already known to be valid.
    pub(crate) fn from_parts(name: &str, version: &str) -> Self {
        Self(format!("{}:{}", URL_SAFE_NO_PAD.encode(name), version))
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[track_caller]
fn invalid(reason: impl Into<String>) -> autoop_error::AutoopError {
    RegistryError::new(RegistryErrorKind::InvalidArtifact(reason.into())).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = ArtifactId::derive("pipeline_model_regression", "1.0.0").unwrap();
        let b = ArtifactId::derive("pipeline_model_regression", "1.0.0").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, ArtifactId::derive("pipeline_model_regression", "1.0.1").unwrap());
    }

    #[test]
    fn test_name_with_separators_is_encoded() {
        let id = ArtifactId::derive("../datasets/iris.csv", "1").unwrap();
        assert!(!id.as_str().contains('/'));
        assert!(!id.as_str().starts_with('.'));
    }

    #[test]
    fn test_invalid_parts_are_rejected() {
        assert!(ArtifactId::derive("", "1").is_err());
        assert!(ArtifactId::derive("enc", "").is_err());
        assert!(ArtifactId::derive("enc", "../1").is_err());
        assert!(ArtifactId::derive("enc", "..").is_err());
    }
}
