//! Storage backends and abstractions.
//!
//! The collection engine consumes storage only through the traits in this
//! module, so backends are pluggable.
//!
//! # Stores and namespaces
//!
//! A store (`KvStoreProvider`) owns one keyspace and carves it into named
//! namespaces (`NamespaceProvider`). A namespace offers:
//! - point `get`/`put`/`delete` by string key
//! - an atomic `batch` of puts and deletes
//! - ordered, one-shot scans over keys or values
//!
//! A missing key is reported as `ErrorKind::NotFound`, set by the backend.
//!
//! # Backends
//!
//! - **In-Memory Store**: `InMemoryStoreModule`, the default
//! - **Fjall Store**: `keydoc-fjall-adapter` for persistent, LSM-based storage

mod batch;
mod iters;
mod kv_store;
pub mod memory;
mod namespace;
mod store_module;

pub use batch::*;
pub use iters::*;
pub use kv_store::*;
pub use namespace::*;
pub use store_module::*;
