//! Byte storage for autoop.
//!
//! This crate provides the storage capability the database and artifact
//! registry are built on: opaque blobs addressed by logical `/`-separated
//! paths, relative to a backend-chosen root.
//!
//! # Features
//!
//! - **Pluggable backends**: `Storage` is object-safe and shared as `Arc<dyn Storage>`
//! - **Path safety**: logical paths are normalized and can never leave the root
//! - **Atomic writes**: `LocalStorage` writes a temp sibling and renames it into place
//!
//! # Example
//!
//! ```rust
//! use autoop_storage::{LocalStorage, Storage};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let storage = LocalStorage::new(dir.path())?;
//!
//! storage.save("models/a.bin", &[0x31, 0x32, 0x33, 0x34])?;
//! assert_eq!(storage.list("models")?, vec!["models/a.bin".to_string()]);
//! assert_eq!(storage.load("models/a.bin")?, b"1234");
//!
//! storage.delete("models/a.bin")?;
//! assert!(storage.load("models/a.bin").unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod local;
mod path;
mod storage;

pub use autoop_error::{StorageError, StorageErrorKind};
pub use local::LocalStorage;
pub use path::{join, normalize};
pub use storage::Storage;
