use crate::errors::KeydocResult;
use crate::store::Namespace;
use std::ops::Deref;
use std::sync::Arc;

/// Contract of a key-value store that carves namespaces out of one keyspace.
///
/// # Lifecycle
/// `open_or_create()` must succeed before any namespace is opened. After
/// `close()` every namespace handed out by the store reports closed and fails
/// further operations with `StoreAlreadyClosed`.
///
/// # Implementations
/// - `InMemoryStore`: volatile, for tests and scratch data
/// - `FjallStore`: persistent, in `keydoc-fjall-adapter`
pub trait KvStoreProvider: Send + Sync {
    /// Opens the underlying storage, creating it if the backend allows.
    fn open_or_create(&self) -> KeydocResult<()>;

    /// Opens (or creates) the namespace with the given name.
    ///
    /// Opening the same name twice returns handles over the same data.
    fn open_namespace(&self, name: &str) -> KeydocResult<Namespace>;

    fn has_namespace(&self, name: &str) -> KeydocResult<bool>;

    fn namespace_names(&self) -> KeydocResult<Vec<String>>;

    /// Makes every acknowledged write durable. A no-op for volatile stores.
    fn commit(&self) -> KeydocResult<()>;

    fn close(&self) -> KeydocResult<()>;

    fn is_closed(&self) -> bool;

    /// Short identifier of the backend, used in log lines.
    fn store_name(&self) -> &'static str;
}

/// Cheaply cloneable handle to a [KvStoreProvider].
#[derive(Clone)]
pub struct KvStore {
    inner: Arc<dyn KvStoreProvider>,
}

impl KvStore {
    pub fn new<T: KvStoreProvider + 'static>(inner: T) -> Self {
        KvStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for KvStore {
    type Target = Arc<dyn KvStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
