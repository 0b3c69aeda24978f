use crate::collection::Document;
use crate::common::{Value, DELETED_FIELD};

/// Outcome of a successful `delete_one`: the key that was removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteOneResult {
    pub deleted: String,
}

impl DeleteOneResult {
    /// Renders the result as `{deleted: key}`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert_unchecked(DELETED_FIELD.to_string(), Value::from(&self.deleted));
        doc
    }
}

/// Outcome of `delete_many`.
///
/// An empty collection renders as `{deleted: 0}`, anything else as
/// `{deleted: [keys]}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteManyResult {
    Empty,
    Deleted(Vec<String>),
}

impl DeleteManyResult {
    /// Number of removed documents.
    pub fn count(&self) -> usize {
        match self {
            DeleteManyResult::Empty => 0,
            DeleteManyResult::Deleted(keys) => keys.len(),
        }
    }

    pub fn keys(&self) -> &[String] {
        match self {
            DeleteManyResult::Empty => &[],
            DeleteManyResult::Deleted(keys) => keys,
        }
    }

    pub fn to_document(&self) -> Document {
        let deleted = match self {
            DeleteManyResult::Empty => Value::I64(0),
            DeleteManyResult::Deleted(keys) => Value::from_vec(keys.clone()),
        };
        let mut doc = Document::new();
        doc.insert_unchecked(DELETED_FIELD.to_string(), deleted);
        doc
    }
}
