// update operators
pub const OP_SET: &str = "$set";
pub const OP_UNSET: &str = "$unset";
pub const SUPPORTED_OPERATORS: [&str; 2] = [OP_SET, OP_UNSET];

// result documents
pub const DELETED_FIELD: &str = "deleted";

// collection names are plain ASCII letters
pub const COLLECTION_NAME_PATTERN: &str = "^[a-zA-Z]+$";

// keys are non-empty and fit a u16 length prefix in the store
pub const MAX_KEY_LENGTH: usize = u16::MAX as usize;

// store defaults
pub const DEFAULT_CACHE_SIZE: u64 = 8 * 1024 * 1024;

pub const KEYDOC_VERSION: &str = env!("CARGO_PKG_VERSION");
