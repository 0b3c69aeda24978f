use crate::common::Value;
use crate::errors::KeydocResult;
use crate::store::{BatchOperation, KeyIterator, ValueIterator};
use std::ops::Deref;
use std::sync::Arc;

/// Contract of one isolated key space inside a key-value store.
///
/// Each collection is backed by exactly one namespace. Keys and values of one
/// namespace are never visible through another, even when both live in the
/// same underlying store.
///
/// # Key Methods
/// - **Point operations**: `get()`, `put()`, `delete()`
/// - **Atomic writes**: `batch()`
/// - **Scans**: `keys()`, `values()` in key order
/// - **Lifecycle**: `close()`, `is_closed()`
///
/// # Errors
/// `get` of a missing key must fail with
/// [ErrorKind::NotFound](crate::errors::ErrorKind::NotFound); callers branch on
/// that kind only. Every other backend failure is reported as `IOError` or
/// `BackendError`. Operations on a closed namespace fail with
/// `StoreAlreadyClosed`.
///
/// # Implementations
/// - `InMemoryNamespace`: `BTreeMap` behind a lock, for tests and scratch data
/// - `FjallNamespace`: a fjall partition, in `keydoc-fjall-adapter`
pub trait NamespaceProvider: Send + Sync {
    /// Retrieves the value stored under `key`.
    fn get(&self, key: &str) -> KeydocResult<Value>;

    /// Inserts or replaces the value stored under `key`.
    fn put(&self, key: &str, value: Value) -> KeydocResult<()>;

    /// Removes `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> KeydocResult<()>;

    /// Applies every operation atomically, in order.
    ///
    /// Either all entries become visible or none do; a reader never observes
    /// part of a batch. An empty batch is a no-op.
    fn batch(&self, operations: Vec<BatchOperation>) -> KeydocResult<()>;

    /// Starts a scan over every key, in ascending key order.
    fn keys(&self) -> KeydocResult<KeyIterator>;

    /// Starts a scan over every value, in ascending key order.
    fn values(&self) -> KeydocResult<ValueIterator>;

    fn name(&self) -> String;

    fn is_closed(&self) -> bool;

    fn close(&self) -> KeydocResult<()>;
}

/// Cheaply cloneable handle to a [NamespaceProvider].
///
/// All clones share the same underlying namespace.
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<dyn NamespaceProvider>,
}

impl Namespace {
    pub fn new<T: NamespaceProvider + 'static>(inner: T) -> Self {
        Namespace {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Namespace {
    type Target = Arc<dyn NamespaceProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
