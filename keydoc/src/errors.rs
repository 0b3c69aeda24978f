use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for keydoc operations.
///
/// Every failure carries exactly one kind. Callers branch on the kind, never on
/// the message text; in particular a store reports a missing key with
/// [ErrorKind::NotFound] and the collection engine decides per operation whether
/// that is a failure or an absent result.
///
/// # Examples
///
/// ```rust
/// use keydoc::errors::{ErrorKind, KeydocError, KeydocResult};
///
/// fn example() -> KeydocResult<()> {
///     Err(KeydocError::new("Key not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Lookup
    /// The requested key or resource does not exist
    NotFound,
    /// A named collection is not configured on the database
    CollectionNotFound,

    // Caller input
    /// Malformed query, modifier, document or configuration
    ValidationError,
    /// A value has the wrong type for the operation (e.g. a non-string key)
    InvalidDataType,
    /// A required field (usually the key field) is missing
    MissingRequiredField,
    /// A field or collection name is not acceptable
    InvalidFieldName,
    /// A key is already present in the collection
    UniqueConstraintViolation,
    /// The operation is not valid in the current context
    InvalidOperation,

    // Encoding
    /// A stored record could not be mapped to a document
    ObjectMappingError,
    /// Bytes could not be encoded or decoded
    EncodingError,

    // Store
    /// Generic IO failure reported by the store
    IOError,
    /// Failure reported by a storage backend
    BackendError,
    /// The store has not been opened yet
    StoreNotInitialized,
    /// The store (or the namespace) has already been closed
    StoreAlreadyClosed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::MissingRequiredField => write!(f, "Missing required field"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::UniqueConstraintViolation => write!(f, "Unique constraint violation"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::StoreNotInitialized => write!(f, "Store not initialized"),
            ErrorKind::StoreAlreadyClosed => write!(f, "Store already closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

impl ErrorKind {
    /// Returns `true` for kinds that describe a structurally invalid call.
    ///
    /// These are rejected before any store access and never leave partial
    /// side effects behind.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::ValidationError
                | ErrorKind::InvalidDataType
                | ErrorKind::MissingRequiredField
                | ErrorKind::InvalidFieldName
        )
    }
}

/// The error type of every fallible keydoc operation.
///
/// `KeydocError` carries a message, a structured [ErrorKind], an optional cause
/// and the backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use keydoc::errors::{ErrorKind, KeydocError};
///
/// let cause = KeydocError::new("disk unplugged", ErrorKind::IOError);
/// let err = KeydocError::new_with_cause("Failed to read key", ErrorKind::BackendError, cause);
/// assert_eq!(err.cause().map(|c| c.kind().clone()), Some(ErrorKind::IOError));
/// ```
#[derive(Clone)]
pub struct KeydocError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<KeydocError>>,
    backtrace: Arc<Backtrace>,
}

impl KeydocError {
    /// Creates a new `KeydocError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        KeydocError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `KeydocError` that wraps the error which caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: KeydocError) -> Self {
        KeydocError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&KeydocError> {
        self.cause.as_deref()
    }

    /// Returns `true` if the store reported a missing key.
    pub fn is_not_found(&self) -> bool {
        self.error_kind == ErrorKind::NotFound
    }
}

impl Display for KeydocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for KeydocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with stack trace, followed by the cause chain
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => write!(f, "{} ({})\n{:?}", self.message, self.error_kind, self.backtrace),
        }
    }
}

impl Error for KeydocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, KeydocError>`.
pub type KeydocResult<T> = Result<T, KeydocError>;

impl From<std::io::Error> for KeydocError {
    fn from(err: std::io::Error) -> Self {
        KeydocError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<serde_json::Error> for KeydocError {
    fn from(err: serde_json::Error) -> Self {
        let error_kind = if err.is_io() {
            ErrorKind::IOError
        } else {
            ErrorKind::EncodingError
        };
        KeydocError::new(&format!("JSON error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for KeydocError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        KeydocError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for KeydocError {
    fn from(msg: String) -> Self {
        KeydocError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for KeydocError {
    fn from(msg: &str) -> Self {
        KeydocError::new(msg, ErrorKind::InternalError)
    }
}
