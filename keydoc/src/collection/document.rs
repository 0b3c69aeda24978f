use crate::collection::validation::{into_array, into_document};
use crate::common::Value;
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Represents a document stored in a keydoc collection.
///
/// A document is an insertion-ordered mapping of field names to [Value]s. Field
/// names are literal: `"a.b"` is a single top-level field, there is no path
/// expansion. Apart from the collection's key field there is no schema.
///
/// Two documents are equal when they hold the same fields with the same values,
/// regardless of field order.
///
/// # Examples
///
/// ```rust
/// use keydoc::doc;
///
/// let doc = doc! {
///     _id: "a",
///     test: 1,
///     tags: ["x", "y"],
///     owner: { name: "Ann" },
/// };
/// assert_eq!(doc.get("_id").and_then(|v| v.as_string()).map(|s| s.as_str()), Some("a"));
/// assert_eq!(doc.size(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified value with the specified field.
    ///
    /// An existing field keeps its position and gets the new value; a new field
    /// is appended. Empty field names are rejected with
    /// [ErrorKind::InvalidFieldName].
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> KeydocResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty field name");
            return Err(KeydocError::new(
                "Document does not support empty field name",
                ErrorKind::InvalidFieldName,
            ));
        }
        self.data.insert(key.to_string(), value.into());
        Ok(())
    }

    // JSON objects may carry any field name, including the empty one
    pub(crate) fn insert_unchecked(&mut self, key: String, value: Value) {
        self.data.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Removes a field, keeping the relative order of the remaining fields.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the field names in insertion order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in self.data.iter() {
            if !value.is_undefined() {
                map.insert(key.clone(), value.to_json());
            }
        }
        serde_json::Value::Object(map)
    }

    pub fn to_json_string(&self) -> KeydocResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a JSON object into a document.
    ///
    /// Fails with [ErrorKind::EncodingError] on malformed JSON and with
    /// [ErrorKind::ValidationError] when the JSON is not an object.
    pub fn from_json_str(json: &str) -> KeydocResult<Document> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        into_document(Value::from_json(value), "JSON input")
    }
}

/// Parses a JSON array of objects into documents.
///
/// This is the typed entry point for untyped batch input: the outer value must
/// be an array and every element an object.
pub fn documents_from_json_str(json: &str) -> KeydocResult<Vec<Document>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    into_array(Value::from_json(value), "JSON input")?
        .into_iter()
        .enumerate()
        .map(|(index, item)| into_document(item, &format!("Element {}", index)))
        .collect()
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.data.iter() {
            if !value.is_undefined() {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Document(doc) => Ok(doc),
            other => Err(serde::de::Error::custom(format!(
                "expected an object, found {}",
                other.type_name()
            ))),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Field names can be bare identifiers or string literals. Values can be
/// literals, `null`, nested `{}` documents, `[]` arrays or any expression
/// convertible into a [Value].
///
/// # Examples
///
/// ```rust
/// use keydoc::doc;
///
/// let empty = doc!{};
/// assert!(empty.is_empty());
///
/// let name = "Ann";
/// let doc = doc! {
///     "_id": "u1",
///     name: name,
///     score: (40 + 2),
///     address: { city: "Oslo", zip: null },
///     tags: ["a", "b"],
/// };
/// assert_eq!(doc.size(), 5);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
macro_rules! doc_value {
    (null) => {
        $crate::common::Value::Null
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
