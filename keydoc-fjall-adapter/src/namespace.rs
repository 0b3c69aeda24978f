use crate::wrapper::{decode_key, to_keydoc_error, FjallValue};
use fjall::{Keyspace, PartitionHandle};
use keydoc::common::Value;
use keydoc::errors::{ErrorKind, KeydocError, KeydocResult};
use keydoc::store::{BatchOperation, KeyIterator, NamespaceProvider, ValueIterator};
use parking_lot::RwLock;
use std::sync::Arc;

/// A namespace stored in one fjall partition.
///
/// Keys are the UTF-8 bytes of the record key, values are JSON-encoded
/// [Value]s. Batches go through the keyspace write batch and land
/// atomically. Scans read a snapshot taken when the iterator is created.
///
/// Closing the namespace drops its partition handle; every later call fails
/// with `StoreAlreadyClosed`.
#[derive(Clone)]
pub struct FjallNamespace {
    inner: Arc<FjallNamespaceInner>,
}

struct FjallNamespaceInner {
    name: String,
    handles: RwLock<Option<PartitionHandles>>,
}

#[derive(Clone)]
struct PartitionHandles {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallNamespace {
    pub(crate) fn new(name: &str, keyspace: Keyspace, partition: PartitionHandle) -> Self {
        FjallNamespace {
            inner: Arc::new(FjallNamespaceInner {
                name: name.to_string(),
                handles: RwLock::new(Some(PartitionHandles {
                    keyspace,
                    partition,
                })),
            }),
        }
    }

    fn handles(&self) -> KeydocResult<PartitionHandles> {
        match self.inner.handles.read().as_ref() {
            Some(handles) => Ok(handles.clone()),
            None => {
                log::error!("Namespace {} is closed", self.inner.name);
                Err(KeydocError::new(
                    &format!("Namespace {} is closed", self.inner.name),
                    ErrorKind::StoreAlreadyClosed,
                ))
            }
        }
    }

    fn encode(&self, value: &Value) -> KeydocResult<FjallValue> {
        FjallValue::try_from_value(value).map_err(|err| {
            log::error!("Failed to encode value for {}: {}", self.inner.name, err);
            KeydocError::from(err)
        })
    }
}

impl NamespaceProvider for FjallNamespace {
    fn get(&self, key: &str) -> KeydocResult<Value> {
        let handles = self.handles()?;
        match handles.partition.get(key.as_bytes()) {
            Ok(Some(bytes)) => FjallValue::from_bytes(&bytes)
                .try_into_value()
                .map_err(|err| {
                    log::error!("Failed to decode {} in {}: {}", key, self.inner.name, err);
                    KeydocError::from(err)
                }),
            Ok(None) => Err(KeydocError::new(
                &format!("Key {} not found in {}", key, self.inner.name),
                ErrorKind::NotFound,
            )),
            Err(err) => {
                log::error!("Failed to get {} from {}: {}", key, self.inner.name, err);
                Err(to_keydoc_error(err))
            }
        }
    }

    fn put(&self, key: &str, value: Value) -> KeydocResult<()> {
        let handles = self.handles()?;
        let encoded = self.encode(&value)?;
        if let Err(err) = handles.partition.insert(key.as_bytes(), encoded.into_bytes()) {
            log::error!("Failed to put {} in {}: {}", key, self.inner.name, err);
            return Err(to_keydoc_error(err));
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> KeydocResult<()> {
        let handles = self.handles()?;
        if let Err(err) = handles.partition.remove(key.as_bytes()) {
            log::error!("Failed to delete {} from {}: {}", key, self.inner.name, err);
            return Err(to_keydoc_error(err));
        }
        Ok(())
    }

    fn batch(&self, operations: Vec<BatchOperation>) -> KeydocResult<()> {
        let handles = self.handles()?;
        if operations.is_empty() {
            return Ok(());
        }

        let count = operations.len();
        let mut batch = handles.keyspace.batch();
        for operation in operations {
            match operation {
                BatchOperation::Put { key, value } => {
                    let encoded = self.encode(&value)?;
                    batch.insert(&handles.partition, key.into_bytes(), encoded.into_bytes());
                }
                BatchOperation::Delete { key } => {
                    batch.remove(&handles.partition, key.into_bytes());
                }
            }
        }

        batch.commit().map_err(|err| {
            log::error!("Failed to commit batch in {}: {}", self.inner.name, err);
            to_keydoc_error(err)
        })?;
        log::debug!("Committed batch of {} operations in {}", count, self.inner.name);
        Ok(())
    }

    fn keys(&self) -> KeydocResult<KeyIterator> {
        let handles = self.handles()?;
        let snapshot = handles.partition.snapshot();
        let keys = snapshot.keys();
        // the snapshot travels with the iterator so its view stays pinned
        let iter = keys.map(move |result| match result {
            Ok(key) => {
                let _pinned = &snapshot;
                decode_key(&key).map_err(KeydocError::from)
            }
            Err(err) => {
                log::error!("Key scan failed: {}", err);
                Err(to_keydoc_error(err))
            }
        });
        Ok(KeyIterator::from_results(iter))
    }

    fn values(&self) -> KeydocResult<ValueIterator> {
        let handles = self.handles()?;
        let snapshot = handles.partition.snapshot();
        let values = snapshot.values();
        let iter = values.map(move |result| match result {
            Ok(bytes) => {
                let _pinned = &snapshot;
                FjallValue::from_bytes(&bytes)
                    .try_into_value()
                    .map_err(KeydocError::from)
            }
            Err(err) => {
                log::error!("Value scan failed: {}", err);
                Err(to_keydoc_error(err))
            }
        });
        Ok(ValueIterator::from_results(iter))
    }

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn is_closed(&self) -> bool {
        self.inner.handles.read().is_none()
    }

    fn close(&self) -> KeydocResult<()> {
        self.inner.handles.write().take();
        Ok(())
    }
}
