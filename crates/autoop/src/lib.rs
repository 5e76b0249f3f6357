//! autoop - persistence core for a small ML pipeline tool.
//!
//! Pipeline code stores and fetches opaque artifacts (datasets, fitted
//! encoders, trained models, pipeline configs) through one [`System`]:
//!
//! - [`Storage`] / [`LocalStorage`] - byte blobs under a base directory
//! - [`Database`] - write-through JSON collections cached in memory
//! - [`ArtifactRegistry`] - versioned artifacts composed of both
//!
//! # Quick Start
//!
//! ```rust
//! use autoop::{Artifact, AutoopConfig, StorageConfig, System};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let config = AutoopConfig::builder()
//!     .storage(StorageConfig::new(dir.path()))
//!     .build()?;
//! let system = System::open(config)?;
//!
//! let dataset = Artifact::builder()
//!     .name("iris")
//!     .version("1.0.0")
//!     .artifact_type("dataset")
//!     .data(b"sepal_length,species\n5.1,setosa\n".to_vec())
//!     .build()?;
//! let id = system.registry().register(&dataset)?;
//!
//! assert_eq!(system.registry().list(Some("dataset"))?.len(), 1);
//! assert_eq!(system.registry().get(&id)?, dataset);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - `autoop_error` - Error types
//! - `autoop_storage` - Storage trait and filesystem backend
//! - `autoop_database` - Key-value collections over storage
//! - `autoop_registry` - Artifact registry
//!
//! This crate re-exports everything and adds configuration, the process
//! context and tracing setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod system;
mod telemetry;

pub use autoop_database::*;
pub use autoop_error::*;
pub use autoop_registry::*;
pub use autoop_storage::*;

pub use config::{
    AutoopConfig, AutoopConfigBuilder, DatabaseConfig, RegistryConfig, StorageConfig,
};
pub use system::System;
pub use telemetry::init_tracing;
