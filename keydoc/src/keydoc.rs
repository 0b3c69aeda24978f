use crate::collection::{Collection, WritePolicy};
use crate::common::LockRegistry;
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use crate::keydoc_builder::KeydocBuilder;
use crate::keydoc_config::KeydocConfig;
use crate::store::KvStore;
use indexmap::IndexMap;
use std::sync::Arc;

/// An open keydoc database.
///
/// A database owns one store and hands out one [Collection] per configured
/// collection name, each backed by its own namespace. Handles are cheap to
/// clone and share the same store. The store is committed and closed when the
/// last handle is dropped, or explicitly with [close](Keydoc::close).
///
/// ```rust
/// use keydoc::collection::CollectionConfig;
/// use keydoc::doc;
/// use keydoc::keydoc::Keydoc;
///
/// let db = Keydoc::builder()
///     .collection("users", CollectionConfig::new("_id"))
///     .open_or_create()
///     .unwrap();
///
/// let users = db.collection("users").unwrap();
/// users.insert_one(doc! { _id: "a", name: "Ann" }).unwrap();
/// assert_eq!(users.count().unwrap(), 1);
/// db.close().unwrap();
/// ```
#[derive(Clone)]
pub struct Keydoc {
    inner: Arc<KeydocInner>,
}

impl std::fmt::Debug for Keydoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keydoc").finish_non_exhaustive()
    }
}

impl Keydoc {
    pub fn builder() -> KeydocBuilder {
        KeydocBuilder::new()
    }

    pub(crate) fn open(config: KeydocConfig) -> KeydocResult<Keydoc> {
        let store = config.create_store()?;
        store.open_or_create()?;

        let lock_registry = LockRegistry::new();
        let mut collections = IndexMap::with_capacity(config.collections().len());
        for (name, collection_config) in config.collections() {
            let collection = store.open_namespace(name).and_then(|namespace| {
                let write_lock = match collection_config.policy() {
                    WritePolicy::Snapshot => None,
                    WritePolicy::Serialized => Some(lock_registry.get_lock(name)),
                };
                Collection::with_lock(namespace, collection_config.clone(), write_lock)
            });

            match collection {
                Ok(collection) => {
                    collections.insert(name.clone(), collection);
                }
                Err(err) => {
                    log::error!("Failed to open collection {}: {}", name, err);
                    if let Err(close_err) = store.close() {
                        log::warn!("Failed to close store after open error: {}", close_err);
                    }
                    return Err(err);
                }
            }
        }

        log::debug!(
            "Opened database on {} store with collections {:?}",
            store.store_name(),
            collections.keys().collect::<Vec<_>>()
        );
        Ok(Keydoc {
            inner: Arc::new(KeydocInner {
                store,
                lock_registry,
                collections,
            }),
        })
    }

    /// Returns the handle of a configured collection.
    ///
    /// Fails with `CollectionNotFound` for a name that was not configured and
    /// with `StoreAlreadyClosed` once the database is closed.
    pub fn collection(&self, name: &str) -> KeydocResult<Collection> {
        self.inner.ensure_opened()?;
        match self.inner.collections.get(name) {
            Some(collection) => Ok(collection.clone()),
            None => {
                log::error!("Collection {} is not configured", name);
                Err(KeydocError::new(
                    &format!("Collection {} is not configured", name),
                    ErrorKind::CollectionNotFound,
                ))
            }
        }
    }

    /// Names of the configured collections, in configuration order.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.keys().cloned().collect()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.contains_key(name)
    }

    /// Flushes acknowledged writes to durable storage.
    pub fn commit(&self) -> KeydocResult<()> {
        self.inner.ensure_opened()?;
        self.inner.store.commit()
    }

    /// Commits and closes the store. Closing twice is a no-op.
    ///
    /// Collection handles obtained earlier fail with `StoreAlreadyClosed`
    /// afterwards.
    pub fn close(&self) -> KeydocResult<()> {
        if self.inner.store.is_closed() {
            log::warn!("Database is already closed");
            return Ok(());
        }
        self.inner.store.commit()?;
        self.inner.store.close()?;
        self.inner.lock_registry.clear();
        log::debug!("Closed database on {} store", self.inner.store.store_name());
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.store.is_closed()
    }

    pub fn store(&self) -> &KvStore {
        &self.inner.store
    }
}

struct KeydocInner {
    store: KvStore,
    lock_registry: LockRegistry,
    collections: IndexMap<String, Collection>,
}

impl KeydocInner {
    fn ensure_opened(&self) -> KeydocResult<()> {
        if self.store.is_closed() {
            log::error!("Database is closed");
            return Err(KeydocError::new(
                "Database is closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}

impl Drop for KeydocInner {
    fn drop(&mut self) {
        if !self.store.is_closed() {
            let _ = self.store.commit();
            let _ = self.store.close();
        }
    }
}
