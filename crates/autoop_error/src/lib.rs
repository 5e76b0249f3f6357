//! Error types for the autoop persistence layer.
//!
//! This crate provides the error types shared by the storage, database and
//! artifact registry crates.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use autoop_error::{AutoopResult, StorageError, StorageErrorKind};
//!
//! fn load_model() -> AutoopResult<Vec<u8>> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("models/a.bin".to_string())))?
//! }
//!
//! let err = load_model().unwrap_err();
//! assert!(err.is_not_found());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod registry;
mod storage;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{AutoopError, AutoopErrorKind, AutoopResult};
pub use registry::{RegistryError, RegistryErrorKind};
pub use storage::{StorageError, StorageErrorKind};
