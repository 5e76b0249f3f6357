//! Versioned ML artifact registry.
//!
//! An artifact is a named, versioned payload plus metadata. The registry
//! keeps the payload as a blob in [`Storage`] and the metadata as an entry
//! in a [`Database`] collection, writing the blob first so metadata never
//! points at a payload that was not written.
//!
//! # Example
//!
//! ```rust
//! use autoop_database::Database;
//! use autoop_registry::{Artifact, ArtifactRegistry};
//! use autoop_storage::{LocalStorage, Storage};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(dir.path())?);
//! let database = Arc::new(Database::with_root(storage.clone(), "dbo")?);
//! let registry = ArtifactRegistry::new(database, storage)?;
//!
//! let encoder = Artifact::builder()
//!     .name("enc")
//!     .version("1")
//!     .artifact_type("OneHotEncoder")
//!     .data(vec![1u8, 2, 3])
//!     .build()?;
//!
//! let id = registry.register(&encoder)?;
//! assert_eq!(registry.get(&id)?, encoder);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! [`Storage`]: autoop_storage::Storage
//! [`Database`]: autoop_database::Database

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod id;
mod record;
mod registry;

pub use artifact::{Artifact, ArtifactBuilder};
pub use autoop_error::{RegistryError, RegistryErrorKind};
pub use id::ArtifactId;
pub use record::ArtifactSummary;
pub use registry::{ArtifactRegistry, DEFAULT_COLLECTION, DEFAULT_OBJECTS_PREFIX};
