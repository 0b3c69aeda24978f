use crate::collection::key_set::KeySet;
use crate::collection::operator::apply_modifier;
use crate::collection::validation::{decode_record, prepare_record, resolve_key};
use crate::collection::{
    documents_from_json_str, CollectionConfig, DeleteManyResult, DeleteOneResult, Document,
    WritePolicy,
};
use crate::common::{LockHandle, Value};
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use crate::store::{BatchOperation, Namespace};
use parking_lot::MutexGuard;
use std::sync::Arc;

/// A named, key-unique set of documents backed by one store namespace.
///
/// Every document is stored under the string value of the configured key
/// field. Lookups are by exact key only.
///
/// # Consistency
///
/// The store offers point operations and atomic batches but no multi-key
/// transactions. Operations that must know the full set of keys (`insert_one`,
/// `insert_many`, `delete_many`, `count`) take a key-set snapshot and then act
/// on it. Under [WritePolicy::Snapshot] concurrent writers can race between
/// the snapshot and the write:
/// - two `insert_one` calls for the same key may both pass the uniqueness
///   check; the later put wins
/// - `delete_many` leaves behind keys inserted after its snapshot
/// - `update_one` is read-modify-write, so concurrent updates can lose writes
///
/// [WritePolicy::Serialized] runs every mutating operation under a write lock
/// shared by all handles for the collection, which removes these races for
/// writers going through the same database.
///
/// No operation reports success after a partial write: single-document writes
/// are one put or delete and multi-document writes are one atomic batch.
///
/// Handles are cheap to clone and share state.
///
/// ```rust
/// use keydoc::collection::{Collection, CollectionConfig};
/// use keydoc::doc;
/// use keydoc::store::memory::InMemoryNamespace;
/// use keydoc::store::Namespace;
///
/// let namespace = Namespace::new(InMemoryNamespace::new("users"));
/// let users = Collection::new(namespace, CollectionConfig::new("_id")).unwrap();
///
/// users.insert_one(doc! { _id: "a", test: 1 }).unwrap();
/// let updated = users.update_one(&doc! { _id: "a" }, &doc! { "$set": { test: 9 } }).unwrap();
/// assert_eq!(updated, Some(doc! { _id: "a", test: 9 }));
/// assert_eq!(users.count().unwrap(), 1);
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    namespace: Namespace,
    config: CollectionConfig,
    write_lock: Option<LockHandle>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Collection {
    /// Creates a collection over `namespace`.
    ///
    /// With [WritePolicy::Serialized] the collection gets a private write lock;
    /// handles for the same collection should be cloned from it, or created
    /// through a database, to share that lock.
    pub fn new(namespace: Namespace, config: CollectionConfig) -> KeydocResult<Collection> {
        let write_lock = match config.policy() {
            WritePolicy::Snapshot => None,
            WritePolicy::Serialized => Some(LockHandle::new()),
        };
        Collection::with_lock(namespace, config, write_lock)
    }

    pub(crate) fn with_lock(
        namespace: Namespace,
        config: CollectionConfig,
        write_lock: Option<LockHandle>,
    ) -> KeydocResult<Collection> {
        config.validate()?;
        Ok(Collection {
            inner: Arc::new(CollectionInner {
                name: namespace.name(),
                namespace,
                config,
                write_lock,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn key_field(&self) -> &str {
        self.inner.config.key()
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.inner.config
    }

    pub fn is_open(&self) -> bool {
        !self.inner.namespace.is_closed()
    }

    /// Returns every document, in key order.
    pub fn find(&self) -> KeydocResult<Vec<Document>> {
        self.ensure_opened()?;
        self.inner
            .namespace
            .values()?
            .map(|record| record.and_then(|value| decode_record(value, &self.inner.name)))
            .collect()
    }

    /// Looks up one document by the key field of `query`.
    ///
    /// Other fields of the query are ignored. A missing key is `Ok(None)`.
    pub fn find_one(&self, query: &Document) -> KeydocResult<Option<Document>> {
        self.ensure_opened()?;
        let key = resolve_key(query, self.key_field())?;
        self.get_by_key(&key)
    }

    /// Inserts one document and returns it as stored, without undefined
    /// fields.
    ///
    /// Fails with [ErrorKind::UniqueConstraintViolation] if the key is already
    /// stored; nothing is written in that case.
    pub fn insert_one(&self, document: Document) -> KeydocResult<Document> {
        self.ensure_opened()?;
        let key = resolve_key(&document, self.key_field())?;
        let document = prepare_record(document)?;

        let _guard = self.write_guard();
        let key_set = KeySet::load(&self.inner.namespace)?;
        if key_set.contains(&key) {
            log::error!("Key {} already exists in {}", key, self.inner.name);
            return Err(KeydocError::new(
                &format!("Key {} already exists in {}", key, self.inner.name),
                ErrorKind::UniqueConstraintViolation,
            ));
        }

        self.inner
            .namespace
            .put(&key, Value::Document(document.clone()))?;
        log::debug!("Inserted {} into {}", key, self.inner.name);
        Ok(document)
    }

    /// Inserts every document in one atomic batch.
    ///
    /// All documents are checked before anything is written: each needs a
    /// string key that is neither stored yet nor repeated within `documents`.
    /// The first failure aborts the whole call. Returns the applied batch.
    pub fn insert_many(&self, documents: Vec<Document>) -> KeydocResult<Vec<BatchOperation>> {
        self.ensure_opened()?;
        let keys = documents
            .iter()
            .map(|document| resolve_key(document, self.key_field()))
            .collect::<KeydocResult<Vec<String>>>()?;
        let documents = documents
            .into_iter()
            .map(prepare_record)
            .collect::<KeydocResult<Vec<Document>>>()?;

        let _guard = self.write_guard();
        let mut key_set = KeySet::load(&self.inner.namespace)?;
        for key in &keys {
            if key_set.contains(key) {
                log::error!("Key {} already exists in {}", key, self.inner.name);
                return Err(KeydocError::new(
                    &format!("Key {} already exists in {}", key, self.inner.name),
                    ErrorKind::UniqueConstraintViolation,
                ));
            }
            key_set.claim(key);
        }

        let operations: Vec<BatchOperation> = keys
            .iter()
            .zip(documents)
            .map(|(key, document)| BatchOperation::put(key, Value::Document(document)))
            .collect();
        self.inner.namespace.batch(operations.clone())?;
        log::debug!("Inserted {} documents into {}", operations.len(), self.inner.name);
        Ok(operations)
    }

    /// Parses a JSON object and inserts it.
    pub fn insert_one_json(&self, json: &str) -> KeydocResult<Document> {
        let document = Document::from_json_str(json)?;
        self.insert_one(document)
    }

    /// Parses a JSON array of objects and inserts them in one batch.
    pub fn insert_many_json(&self, json: &str) -> KeydocResult<Vec<BatchOperation>> {
        let documents = documents_from_json_str(json)?;
        self.insert_many(documents)
    }

    /// Applies `modifier` to the document addressed by `query` and stores it.
    ///
    /// Returns the updated document, or `Ok(None)` if no document has that
    /// key. A modifier that would change or remove the key field is rejected
    /// with [ErrorKind::ValidationError] and nothing is written.
    pub fn update_one(
        &self,
        query: &Document,
        modifier: &Document,
    ) -> KeydocResult<Option<Document>> {
        self.ensure_opened()?;
        let key = resolve_key(query, self.key_field())?;

        let _guard = self.write_guard();
        let found = match self.get_by_key(&key)? {
            Some(found) => found,
            None => {
                log::debug!("Nothing to update for {} in {}", key, self.inner.name);
                return Ok(None);
            }
        };

        let updated = prepare_record(apply_modifier(found, modifier))?;
        match updated.get(self.key_field()) {
            Some(Value::String(new_key)) if *new_key == key => {}
            _ => {
                log::error!(
                    "Update of {} in {} cannot change key field {}",
                    key,
                    self.inner.name,
                    self.key_field()
                );
                return Err(KeydocError::new(
                    &format!(
                        "Update of {} in {} cannot change key field {}",
                        key,
                        self.inner.name,
                        self.key_field()
                    ),
                    ErrorKind::ValidationError,
                ));
            }
        }

        self.inner
            .namespace
            .put(&key, Value::Document(updated.clone()))?;
        log::debug!("Updated {} in {}", key, self.inner.name);
        Ok(Some(updated))
    }

    /// Deletes the document addressed by `query`.
    ///
    /// The key is read first; a missing key is `Ok(None)`, consistent with
    /// `find_one` and `update_one`.
    pub fn delete_one(&self, query: &Document) -> KeydocResult<Option<DeleteOneResult>> {
        self.ensure_opened()?;
        let key = resolve_key(query, self.key_field())?;

        let _guard = self.write_guard();
        if self.get_by_key(&key)?.is_none() {
            log::debug!("Nothing to delete for {} in {}", key, self.inner.name);
            return Ok(None);
        }

        self.inner.namespace.delete(&key)?;
        log::debug!("Deleted {} from {}", key, self.inner.name);
        Ok(Some(DeleteOneResult { deleted: key }))
    }

    /// Deletes every document currently stored, in one atomic batch.
    pub fn delete_many(&self) -> KeydocResult<DeleteManyResult> {
        self.ensure_opened()?;

        let _guard = self.write_guard();
        let key_set = KeySet::load(&self.inner.namespace)?;
        if key_set.is_empty() {
            return Ok(DeleteManyResult::Empty);
        }

        let keys = key_set.into_keys();
        let operations = keys.iter().map(|key| BatchOperation::delete(key)).collect();
        self.inner.namespace.batch(operations)?;
        log::debug!("Deleted {} documents from {}", keys.len(), self.inner.name);
        Ok(DeleteManyResult::Deleted(keys))
    }

    /// Number of documents currently stored.
    pub fn count(&self) -> KeydocResult<usize> {
        self.ensure_opened()?;
        Ok(KeySet::load(&self.inner.namespace)?.len())
    }

    fn get_by_key(&self, key: &str) -> KeydocResult<Option<Document>> {
        match self.inner.namespace.get(key) {
            Ok(record) => decode_record(record, &self.inner.name).map(Some),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => {
                log::error!("Failed to read {} from {}: {}", key, self.inner.name, err);
                Err(err)
            }
        }
    }

    fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        self.inner.write_lock.as_ref().map(|lock| lock.acquire())
    }

    fn ensure_opened(&self) -> KeydocResult<()> {
        if self.inner.namespace.is_closed() {
            log::error!("Collection {} is closed", self.inner.name);
            return Err(KeydocError::new(
                &format!("Collection {} is closed", self.inner.name),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}
