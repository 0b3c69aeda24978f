use crate::config::FjallConfig;
use crate::namespace::FjallNamespace;
use crate::wrapper::to_keydoc_error;
use dashmap::DashMap;
use fjall::{Keyspace, PersistMode};
use keydoc::errors::{ErrorKind, KeydocError, KeydocResult};
use keydoc::store::{KvStoreProvider, Namespace, NamespaceProvider};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Persistent key-value store backed by a fjall keyspace.
///
/// Every namespace is one partition of the keyspace. The keyspace is opened
/// by `open_or_create` and released by `close`, which also closes every
/// namespace handed out so far. Opening again after a close starts a fresh
/// keyspace over the same directory.
#[derive(Clone)]
pub struct FjallStore {
    inner: Arc<FjallStoreInner>,
}

impl FjallStore {
    #[inline]
    pub fn new(config: FjallConfig) -> FjallStore {
        FjallStore {
            inner: Arc::new(FjallStoreInner::new(config)),
        }
    }

    pub fn config(&self) -> &FjallConfig {
        &self.inner.store_config
    }
}

impl KvStoreProvider for FjallStore {
    fn open_or_create(&self) -> KeydocResult<()> {
        self.inner.open_or_create()
    }

    fn open_namespace(&self, name: &str) -> KeydocResult<Namespace> {
        self.inner.open_namespace(name)
    }

    fn has_namespace(&self, name: &str) -> KeydocResult<bool> {
        let keyspace = self.inner.keyspace()?;
        Ok(keyspace.partition_exists(name))
    }

    fn namespace_names(&self) -> KeydocResult<Vec<String>> {
        let keyspace = self.inner.keyspace()?;
        let mut names: Vec<String> = keyspace
            .list_partitions()
            .iter()
            .map(|partition| {
                let name: &str = partition;
                name.to_string()
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn commit(&self) -> KeydocResult<()> {
        self.inner.commit()
    }

    fn close(&self) -> KeydocResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    fn store_name(&self) -> &'static str {
        "fjall"
    }
}

struct FjallStoreInner {
    keyspace: RwLock<Option<Keyspace>>,
    closed: AtomicBool,
    store_config: FjallConfig,
    namespace_registry: DashMap<String, FjallNamespace>,
}

impl FjallStoreInner {
    fn new(config: FjallConfig) -> FjallStoreInner {
        FjallStoreInner {
            keyspace: RwLock::new(None),
            closed: AtomicBool::new(false),
            store_config: config,
            namespace_registry: DashMap::new(),
        }
    }

    fn keyspace(&self) -> KeydocResult<Keyspace> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Fjall store is already closed");
            return Err(KeydocError::new(
                "Fjall store is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        match self.keyspace.read().as_ref() {
            Some(keyspace) => Ok(keyspace.clone()),
            None => {
                log::error!("Fjall keyspace is not opened yet");
                Err(KeydocError::new(
                    "Fjall keyspace is not opened yet",
                    ErrorKind::StoreNotInitialized,
                ))
            }
        }
    }

    fn check_path(&self) -> KeydocResult<()> {
        let db_path = self.store_config.db_path();
        if db_path.is_empty() {
            log::error!("Fjall store requires a db_path");
            return Err(KeydocError::new(
                "Fjall store requires a db_path",
                ErrorKind::ValidationError,
            ));
        }

        let exists = Path::new(db_path).exists();
        if !exists && !self.store_config.create_if_missing() {
            log::error!("Keyspace {} does not exist and create_if_missing is off", db_path);
            return Err(KeydocError::new(
                &format!("Keyspace {} does not exist", db_path),
                ErrorKind::IOError,
            ));
        }
        if exists && self.store_config.error_if_exists() {
            log::error!("Keyspace {} already exists and error_if_exists is on", db_path);
            return Err(KeydocError::new(
                &format!("Keyspace {} already exists", db_path),
                ErrorKind::IOError,
            ));
        }
        Ok(())
    }

    fn open_or_create(&self) -> KeydocResult<()> {
        let mut guard = self.keyspace.write();
        if guard.is_some() {
            return Ok(());
        }

        self.check_path()?;
        match Keyspace::open(self.store_config.keyspace_config()) {
            Ok(keyspace) => {
                *guard = Some(keyspace);
                self.closed.store(false, Ordering::Relaxed);
                log::debug!("Opened fjall keyspace at {}", self.store_config.db_path());
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to open or create keyspace: {}", err);
                Err(to_keydoc_error(err))
            }
        }
    }

    fn open_namespace(&self, name: &str) -> KeydocResult<Namespace> {
        if let Some(namespace) = self.namespace_registry.get(name) {
            if !namespace.is_closed() {
                return Ok(Namespace::new(namespace.clone()));
            }
        }

        let keyspace = self.keyspace()?;
        match keyspace.open_partition(name, self.store_config.partition_config()) {
            Ok(partition) => {
                let namespace = FjallNamespace::new(name, keyspace, partition);
                self.namespace_registry
                    .insert(name.to_string(), namespace.clone());
                Ok(Namespace::new(namespace))
            }
            Err(err) => {
                log::error!("Failed to open partition {}: {}", name, err);
                Err(to_keydoc_error(err))
            }
        }
    }

    fn commit(&self) -> KeydocResult<()> {
        let keyspace = self.keyspace()?;
        keyspace.persist(PersistMode::SyncAll).map_err(|err| {
            log::error!("Failed to commit keyspace: {}", err);
            to_keydoc_error(err)
        })
    }

    fn close(&self) -> KeydocResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }

        let keyspace = self.keyspace.write().take();
        if let Some(keyspace) = &keyspace {
            if self.store_config.commit_before_close() {
                if let Err(err) = keyspace.persist(PersistMode::SyncAll) {
                    log::error!("Failed to commit keyspace on close: {}", err);
                    return Err(to_keydoc_error(err));
                }
            }
        }

        for namespace in self.namespace_registry.iter() {
            namespace.close()?;
        }
        self.namespace_registry.clear();
        log::debug!("Closed fjall keyspace at {}", self.store_config.db_path());
        Ok(())
    }
}

impl Drop for FjallStoreInner {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("Failed to close fjall store: {}", e);
        }
    }
}
