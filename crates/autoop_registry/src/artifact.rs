//! Artifact type.

use crate::ArtifactId;
use autoop_error::{AutoopResult, RegistryError, RegistryErrorKind};
use serde_json::{Map, Value as JsonValue};

/// A named, versioned pipeline output: metadata plus an opaque payload.
///
/// Built through [`Artifact::builder`], which validates that the name and
/// version produce a usable [`ArtifactId`].
///
/// # Examples
///
/// ```
/// use autoop_registry::Artifact;
///
/// let dataset = Artifact::builder()
///     .name("iris")
///     .version("1.0.0")
///     .artifact_type("dataset")
///     .tags(vec!["tabular".to_string()])
///     .data(b"sepal_length,species\n5.1,setosa\n".to_vec())
///     .build()
///     .unwrap();
///
/// assert_eq!(dataset.id().as_str(), "aXJpcw:1.0.0");
/// assert_eq!(dataset.artifact_type(), "dataset");
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct Artifact {
    /// Logical artifact name.
    name: String,
    /// Version string, part of the id.
    version: String,
    /// Type tag used to filter listings (e.g. "dataset", "model").
    artifact_type: String,
    /// Free-form labels.
    #[builder(default)]
    tags: Vec<String>,
    /// Arbitrary extra metadata.
    #[builder(default)]
    metadata: Map<String, JsonValue>,
    /// Opaque payload bytes.
    #[builder(default)]
    data: Vec<u8>,
}

impl ArtifactBuilder {
    /// Build the Artifact.
    ///
    /// # Errors
    ///
    /// `RegistryErrorKind::InvalidArtifact` if a required field is missing,
    /// the type tag is empty, or name and version do not form a valid id.
    pub fn build(&self) -> AutoopResult<Artifact> {
        let artifact = self.build_internal().map_err(|e| {
            RegistryError::new(RegistryErrorKind::InvalidArtifact(e.to_string()))
        })?;

        ArtifactId::derive(&artifact.name, &artifact.version)?;
        if artifact.artifact_type.is_empty() {
            return Err(RegistryError::new(RegistryErrorKind::InvalidArtifact(
                "artifact type must not be empty".to_string(),
            ))
            .into());
        }

        Ok(artifact)
    }
}

impl Artifact {
    /// Creates a new artifact builder.
    pub fn builder() -> ArtifactBuilder {
        ArtifactBuilder::default()
    }

    /// Id derived from name and version.
    pub fn id(&self) -> ArtifactId {
        ArtifactId::from_parts(&self.name, &self.version)
    }

    /// Consume the artifact, returning its payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn from_parts(
        name: String,
        version: String,
        artifact_type: String,
        tags: Vec<String>,
        metadata: Map<String, JsonValue>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name,
            version,
            artifact_type,
            tags,
            metadata,
            data,
        }
    }
}
