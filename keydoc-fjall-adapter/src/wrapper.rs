use keydoc::common::Value;
use keydoc::errors::{ErrorKind, KeydocError};
use thiserror::Error;

/// Failure encoding or decoding a record stored in a fjall partition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FjallValueError {
    #[error("Serialization failed: {0}")]
    SerializationError(String),
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),
    #[error("Invalid UTF-8 in stored key: {0}")]
    InvalidUtf8(String),
}

impl From<FjallValueError> for KeydocError {
    fn from(err: FjallValueError) -> Self {
        let kind = match &err {
            FjallValueError::DeserializationError(_) => ErrorKind::ObjectMappingError,
            _ => ErrorKind::EncodingError,
        };
        KeydocError::new(&err.to_string(), kind)
    }
}

pub type FjallValueResult<T> = Result<T, FjallValueError>;

/// A [Value] encoded as self-describing JSON bytes.
///
/// Fields holding `Undefined` are dropped on encode, so they never reach
/// the partition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FjallValue(Vec<u8>);

impl FjallValue {
    pub fn try_from_value(value: &Value) -> FjallValueResult<FjallValue> {
        serde_json::to_vec(value)
            .map(FjallValue)
            .map_err(|err| FjallValueError::SerializationError(err.to_string()))
    }

    pub fn try_into_value(self) -> FjallValueResult<Value> {
        serde_json::from_slice(&self.0)
            .map_err(|err| FjallValueError::DeserializationError(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> FjallValue {
        FjallValue(bytes.to_vec())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for FjallValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Decodes a partition key, which is always the UTF-8 bytes of a string.
pub(crate) fn decode_key(bytes: &[u8]) -> FjallValueResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|err| FjallValueError::InvalidUtf8(err.to_string()))
}

/// Maps a fjall or storage-engine failure onto a [KeydocError].
pub(crate) fn to_keydoc_error<E: Into<fjall::Error>>(error: E) -> KeydocError {
    let error: fjall::Error = error.into();
    let kind = match &error {
        fjall::Error::Io(_) => ErrorKind::IOError,
        _ => ErrorKind::BackendError,
    };
    KeydocError::new(&format!("Fjall Error: {}", error), kind)
}
