//! Persistent fjall storage for keydoc.
//!
//! Load [FjallModule] into a keydoc builder to keep every collection in its
//! own partition of an on-disk fjall keyspace.

mod config;
mod module;
mod namespace;
mod store;
mod wrapper;

pub use config::*;
pub use module::*;
pub use namespace::*;
pub use store::*;
pub use wrapper::{FjallValue, FjallValueError, FjallValueResult};
