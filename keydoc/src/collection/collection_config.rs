use crate::collection::validation::validate_key_field;
use crate::errors::KeydocResult;
use serde::{Deserialize, Serialize};

/// How a collection coordinates concurrent mutating operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Snapshot-then-act with no locking.
    ///
    /// Uniqueness checks, `delete_many` and `insert_many` read a key-set
    /// snapshot and then write. Two writers racing on the same key can both
    /// pass the uniqueness check; the later put wins. `delete_many` misses
    /// keys inserted after its snapshot.
    #[default]
    Snapshot,
    /// Every mutating operation holds the collection's write lock.
    ///
    /// The lock is shared by every handle the same database hands out for the
    /// collection name, which closes the races above for writers in this
    /// process. Reads never take it.
    Serialized,
}

/// Per-collection settings: the key field and the write policy.
///
/// Immutable once a collection is opened.
///
/// ```rust
/// use keydoc::collection::{CollectionConfig, WritePolicy};
///
/// let config = CollectionConfig::new("_id").write_policy(WritePolicy::Serialized);
/// assert_eq!(config.key(), "_id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    key: String,
    #[serde(default)]
    write_policy: WritePolicy,
}

impl CollectionConfig {
    pub fn new(key: &str) -> Self {
        CollectionConfig {
            key: key.to_string(),
            write_policy: WritePolicy::default(),
        }
    }

    pub fn write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> WritePolicy {
        self.write_policy
    }

    pub fn validate(&self) -> KeydocResult<()> {
        validate_key_field(&self.key)
    }
}
