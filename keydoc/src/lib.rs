//! # Keydoc - Embedded Keyed Document Store
//!
//! Keydoc stores JSON-like documents in named collections, each keyed by one
//! designated string field. Collections live in namespaces of a pluggable
//! key-value store: an in-memory store ships with this crate, a persistent
//! store backed by `fjall` lives in `keydoc-fjall-adapter`.
//!
//! ## Quick Start
//!
//! ```rust
//! use keydoc::collection::CollectionConfig;
//! use keydoc::doc;
//! use keydoc::keydoc::Keydoc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Keydoc::builder()
//!     .collection("users", CollectionConfig::new("_id"))
//!     .open_or_create()?;
//!
//! let users = db.collection("users")?;
//! users.insert_one(doc! { _id: "a", name: "Ann", age: 31 })?;
//!
//! let updated = users.update_one(&doc! { _id: "a" }, &doc! { "$set": { age: 32 } })?;
//! assert_eq!(updated.unwrap().get("age"), Some(&32.into()));
//!
//! users.delete_one(&doc! { _id: "a" })?;
//! assert_eq!(users.count()?, 0);
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Consistency
//!
//! Each single-document operation is one store call. `insert_many` commits one
//! atomic batch. Uniqueness checks and `delete_many` work on a key snapshot, so
//! concurrent writers can race unless the collection uses
//! [WritePolicy::Serialized](collection::WritePolicy::Serialized).
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, the collection engine and update operators
//! - [`common`] - Values, locks and constants
//! - [`errors`] - Error types and result definitions
//! - [`keydoc`] - The database handle
//! - [`keydoc_builder`] - Builder for opening a database
//! - [`keydoc_config`] - Database configuration
//! - [`store`] - Key-value store abstractions and the in-memory store

pub mod collection;
pub mod common;
pub mod errors;
pub mod keydoc;
pub mod keydoc_builder;
pub mod keydoc_config;
pub mod store;

pub use crate::collection::{Collection, CollectionConfig, Document, WritePolicy};
pub use crate::common::Value;
pub use crate::errors::{ErrorKind, KeydocError, KeydocResult};
pub use crate::keydoc::Keydoc;
