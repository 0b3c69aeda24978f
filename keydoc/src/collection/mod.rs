//! Collections and documents.
//!
//! # Documents
//!
//! A `Document` is an insertion-ordered map of field names to `Value`s.
//!
//! ```rust
//! use keydoc::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("_id", "alice").unwrap();
//! doc.put("age", 30).unwrap();
//! ```
//!
//! # Collections
//!
//! A `Collection` stores documents in one namespace, keyed by the string
//! value of a configured field. It supports:
//! - `find`, `find_one` by exact key, `count`
//! - `insert_one`, `insert_many` with key uniqueness
//! - `update_one` with the `$set` / `$unset` modifier language
//! - `delete_one`, `delete_many`
//!
//! Input shape is checked before any store access, so invalid calls have no
//! side effects.

mod collection_config;
mod document;
mod engine;
mod key_set;
mod operator;
mod results;
pub mod validation;

pub use collection_config::*;
pub use document::*;
pub use engine::*;
pub use key_set::*;
pub use operator::*;
pub use results::*;
