use crate::collection::Document;
use crate::common::Value;

/// One entry of an atomic batch write.
///
/// A batch is an ordered `Vec<BatchOperation>` handed to
/// [NamespaceProvider::batch](crate::store::NamespaceProvider::batch); the store
/// applies all of its entries or none of them.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchOperation {
    Put { key: String, value: Value },
    Delete { key: String },
}

impl BatchOperation {
    pub fn put(key: &str, value: Value) -> Self {
        BatchOperation::Put {
            key: key.to_string(),
            value,
        }
    }

    pub fn delete(key: &str) -> Self {
        BatchOperation::Delete {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            BatchOperation::Put { key, .. } => key,
            BatchOperation::Delete { key } => key,
        }
    }

    pub fn is_put(&self) -> bool {
        matches!(self, BatchOperation::Put { .. })
    }

    /// Renders the operation as `{type, key, value?}`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        match self {
            BatchOperation::Put { key, value } => {
                doc.insert_unchecked("type".to_string(), Value::from("put"));
                doc.insert_unchecked("key".to_string(), Value::from(key));
                doc.insert_unchecked("value".to_string(), value.clone());
            }
            BatchOperation::Delete { key } => {
                doc.insert_unchecked("type".to_string(), Value::from("del"));
                doc.insert_unchecked("key".to_string(), Value::from(key));
            }
        }
        doc
    }
}
