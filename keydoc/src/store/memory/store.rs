use super::InMemoryNamespace;
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use crate::store::{KvStoreProvider, Namespace, NamespaceProvider};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Volatile key-value store holding one [InMemoryNamespace] per name.
///
/// Data lives as long as the store object. Closing the store closes every
/// namespace; opening it again makes the same data reachable.
///
/// ```rust
/// use keydoc::common::Value;
/// use keydoc::store::memory::InMemoryStore;
/// use keydoc::store::KvStoreProvider;
///
/// let store = InMemoryStore::new();
/// store.open_or_create().unwrap();
/// let ns = store.open_namespace("users").unwrap();
/// ns.put("a", Value::from(1)).unwrap();
/// assert_eq!(ns.get("a").unwrap(), Value::from(1));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    opened: AtomicBool,
    closed: AtomicBool,
    namespaces: DashMap<String, InMemoryNamespace>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    fn ensure_opened(&self) -> KeydocResult<()> {
        if self.inner.closed.load(Ordering::Relaxed) {
            log::error!("In-memory store is already closed");
            return Err(KeydocError::new(
                "In-memory store is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        if !self.inner.opened.load(Ordering::Relaxed) {
            log::error!("In-memory store is not opened yet");
            return Err(KeydocError::new(
                "In-memory store is not opened yet",
                ErrorKind::StoreNotInitialized,
            ));
        }
        Ok(())
    }
}

impl KvStoreProvider for InMemoryStore {
    fn open_or_create(&self) -> KeydocResult<()> {
        for entry in self.inner.namespaces.iter() {
            entry.value().reopen();
        }
        self.inner.closed.store(false, Ordering::Relaxed);
        self.inner.opened.store(true, Ordering::Relaxed);
        log::debug!("Opened in-memory store");
        Ok(())
    }

    fn open_namespace(&self, name: &str) -> KeydocResult<Namespace> {
        self.ensure_opened()?;
        let namespace = self
            .inner
            .namespaces
            .entry(name.to_string())
            .or_insert_with(|| InMemoryNamespace::new(name))
            .value()
            .clone();
        Ok(Namespace::new(namespace))
    }

    fn has_namespace(&self, name: &str) -> KeydocResult<bool> {
        self.ensure_opened()?;
        Ok(self.inner.namespaces.contains_key(name))
    }

    fn namespace_names(&self) -> KeydocResult<Vec<String>> {
        self.ensure_opened()?;
        let mut names: Vec<String> = self
            .inner
            .namespaces
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn commit(&self) -> KeydocResult<()> {
        self.ensure_opened()
    }

    fn close(&self) -> KeydocResult<()> {
        if self.inner.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        for entry in self.inner.namespaces.iter() {
            entry.value().close()?;
        }
        log::debug!("Closed in-memory store");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
