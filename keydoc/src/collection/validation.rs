//! Shape checks run before any store access.
//!
//! Every collection operation validates its input here first, so a
//! structurally invalid call fails without side effects. Parameters that are
//! already typed (a [Document] query, a `Vec<Document>` batch) need no runtime
//! check; the functions below cover what the types cannot express, plus the
//! untyped JSON entry points.

use crate::collection::Document;
use crate::common::{Value, COLLECTION_NAME_PATTERN, MAX_KEY_LENGTH};
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use regex::Regex;
use std::sync::LazyLock;

static COLLECTION_NAME_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(COLLECTION_NAME_PATTERN));

/// Unwraps a value that must be a document.
pub fn into_document(value: Value, what: &str) -> KeydocResult<Document> {
    match value {
        Value::Document(doc) => Ok(doc),
        other => {
            log::error!("{} must be an object, found {}", what, other.type_name());
            Err(KeydocError::new(
                &format!("{} must be an object, found {}", what, other.type_name()),
                ErrorKind::ValidationError,
            ))
        }
    }
}

/// Unwraps a value that must be an array.
pub fn into_array(value: Value, what: &str) -> KeydocResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => {
            log::error!("{} must be an array, found {}", what, other.type_name());
            Err(KeydocError::new(
                &format!("{} must be an array, found {}", what, other.type_name()),
                ErrorKind::ValidationError,
            ))
        }
    }
}

/// Borrows a value that must be a string.
pub fn require_string<'a>(value: &'a Value, what: &str) -> KeydocResult<&'a str> {
    match value {
        Value::String(s) => Ok(s.as_str()),
        other => {
            log::error!("{} must be a string, found {}", what, other.type_name());
            Err(KeydocError::new(
                &format!("{} must be a string, found {}", what, other.type_name()),
                ErrorKind::InvalidDataType,
            ))
        }
    }
}

/// Resolves the store key of a document or query.
///
/// The key field must be present and hold a non-empty string of at most
/// [MAX_KEY_LENGTH] bytes.
pub fn resolve_key(doc: &Document, key_field: &str) -> KeydocResult<String> {
    let key = match doc.get(key_field) {
        None | Some(Value::Undefined) => {
            log::error!("Key field {} is missing", key_field);
            return Err(KeydocError::new(
                &format!("Key field {} is missing", key_field),
                ErrorKind::MissingRequiredField,
            ));
        }
        Some(value) => require_string(value, &format!("Key field {}", key_field))?,
    };

    if key.is_empty() {
        log::error!("Key field {} cannot be an empty string", key_field);
        return Err(KeydocError::new(
            &format!("Key field {} cannot be an empty string", key_field),
            ErrorKind::ValidationError,
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        log::error!(
            "Key field {} is {} bytes long, the limit is {}",
            key_field,
            key.len(),
            MAX_KEY_LENGTH
        );
        return Err(KeydocError::new(
            &format!(
                "Key field {} is {} bytes long, the limit is {}",
                key_field,
                key.len(),
                MAX_KEY_LENGTH
            ),
            ErrorKind::ValidationError,
        ));
    }
    Ok(key.to_string())
}

/// Readies a document for storage.
///
/// Fields holding [Value::Undefined] are dropped at every depth and undefined
/// array elements become null, the same shape the document has as JSON.
/// Floats must be finite.
pub fn prepare_record(document: Document) -> KeydocResult<Document> {
    let mut prepared = Document::new();
    for (field, value) in document {
        if value.is_undefined() {
            continue;
        }
        let value = prepare_value(value, &field)?;
        prepared.insert_unchecked(field, value);
    }
    Ok(prepared)
}

fn prepare_value(value: Value, field: &str) -> KeydocResult<Value> {
    match value {
        Value::F64(f) if !f.is_finite() => {
            log::error!("Field {} holds a non-finite float {}", field, f);
            Err(KeydocError::new(
                &format!("Field {} holds a non-finite float {}", field, f),
                ErrorKind::ValidationError,
            ))
        }
        Value::Undefined => Ok(Value::Null),
        Value::Array(items) => items
            .into_iter()
            .map(|item| prepare_value(item, field))
            .collect::<KeydocResult<Vec<Value>>>()
            .map(Value::Array),
        Value::Document(doc) => prepare_record(doc).map(Value::Document),
        other => Ok(other),
    }
}

/// Maps a record read from a namespace back into a document.
pub fn decode_record(value: Value, namespace: &str) -> KeydocResult<Document> {
    match value {
        Value::Document(doc) => Ok(doc),
        other => {
            log::error!(
                "Record in {} is a {}, not a document",
                namespace,
                other.type_name()
            );
            Err(KeydocError::new(
                &format!("Record in {} is a {}, not a document", namespace, other.type_name()),
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

/// Checks that a collection name is one or more ASCII letters.
pub fn validate_collection_name(name: &str) -> KeydocResult<()> {
    let valid = match COLLECTION_NAME_REGEX.as_ref() {
        Ok(regex) => regex.is_match(name),
        Err(err) => {
            log::error!("Invalid collection name pattern: {}", err);
            return Err(KeydocError::new(
                &format!("Invalid collection name pattern: {}", err),
                ErrorKind::InternalError,
            ));
        }
    };

    if !valid {
        log::error!("Collection name {:?} must match {}", name, COLLECTION_NAME_PATTERN);
        return Err(KeydocError::new(
            &format!("Collection name {:?} must match {}", name, COLLECTION_NAME_PATTERN),
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}

/// Checks that a key field name is usable.
pub fn validate_key_field(key_field: &str) -> KeydocResult<()> {
    if key_field.is_empty() {
        log::error!("Key field name cannot be empty");
        return Err(KeydocError::new(
            "Key field name cannot be empty",
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}
