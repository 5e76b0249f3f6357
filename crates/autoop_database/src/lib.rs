//! Key-value collections for autoop, persisted through [`Storage`].
//!
//! A [`Database`] keeps every entry in an in-memory cache and writes each
//! `set` straight through to storage, one JSON blob per entry at
//! `{root}/{collection}/{id}`. The cache is authoritative until
//! [`Database::refresh`] re-reads storage.
//!
//! # Example
//!
//! ```rust
//! use autoop_database::{Database, Entry};
//! use autoop_storage::LocalStorage;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let db = Database::new(Arc::new(LocalStorage::new(dir.path())?))?;
//!
//! let mut entry = Entry::new();
//! entry.insert("name".to_string(), json!("model1"));
//! db.set("artifacts", "m1", entry.clone())?;
//!
//! db.refresh()?;
//! assert_eq!(db.get("artifacts", "m1")?, entry);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! [`Storage`]: autoop_storage::Storage

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod database;
mod key;

pub use autoop_error::{DatabaseError, DatabaseErrorKind};
pub use database::Database;
pub use key::validate_key;

/// A stored record: arbitrary JSON fields keyed by name.
pub type Entry = serde_json::Map<String, serde_json::Value>;
