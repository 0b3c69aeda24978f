use crate::common::Value;
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use crate::store::{BatchOperation, KeyIterator, NamespaceProvider, ValueIterator};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory namespace backed by an ordered map.
///
/// Point operations and batches take the write guard once, so a batch is
/// atomic with respect to every reader. Scans copy the namespace under the
/// read guard and then iterate that copy, so writes that land during a scan
/// are never observed by it.
#[derive(Clone)]
pub struct InMemoryNamespace {
    inner: Arc<InMemoryNamespaceInner>,
}

struct InMemoryNamespaceInner {
    name: String,
    data: RwLock<BTreeMap<String, Value>>,
    closed: AtomicBool,
}

impl InMemoryNamespace {
    pub fn new(name: &str) -> Self {
        InMemoryNamespace {
            inner: Arc::new(InMemoryNamespaceInner {
                name: name.to_string(),
                data: RwLock::new(BTreeMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn reopen(&self) {
        self.inner.closed.store(false, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    fn ensure_opened(&self) -> KeydocResult<()> {
        if self.inner.closed.load(Ordering::Relaxed) {
            log::error!("Namespace {} is closed", self.inner.name);
            return Err(KeydocError::new(
                &format!("Namespace {} is closed", self.inner.name),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}

impl NamespaceProvider for InMemoryNamespace {
    fn get(&self, key: &str) -> KeydocResult<Value> {
        self.ensure_opened()?;
        match self.inner.data.read().get(key) {
            Some(value) => Ok(value.clone()),
            None => Err(KeydocError::new(
                &format!("Key {} not found in {}", key, self.inner.name),
                ErrorKind::NotFound,
            )),
        }
    }

    fn put(&self, key: &str, value: Value) -> KeydocResult<()> {
        self.ensure_opened()?;
        self.inner.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> KeydocResult<()> {
        self.ensure_opened()?;
        self.inner.data.write().remove(key);
        Ok(())
    }

    fn batch(&self, operations: Vec<BatchOperation>) -> KeydocResult<()> {
        self.ensure_opened()?;
        if operations.is_empty() {
            return Ok(());
        }

        let mut data = self.inner.data.write();
        for operation in operations {
            match operation {
                BatchOperation::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn keys(&self) -> KeydocResult<KeyIterator> {
        self.ensure_opened()?;
        let snapshot: Vec<String> = self.inner.data.read().keys().cloned().collect();
        Ok(KeyIterator::from_results(snapshot.into_iter().map(Ok)))
    }

    fn values(&self) -> KeydocResult<ValueIterator> {
        self.ensure_opened()?;
        let snapshot: Vec<Value> = self.inner.data.read().values().cloned().collect();
        Ok(ValueIterator::from_results(snapshot.into_iter().map(Ok)))
    }

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    fn close(&self) -> KeydocResult<()> {
        self.inner.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
