use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A shareable write lock guarding the mutating operations of one collection.
///
/// Every clone refers to the same underlying mutex.
#[derive(Clone, Default)]
pub struct LockHandle {
    lock: Arc<Mutex<()>>,
}

impl LockHandle {
    pub fn new() -> Self {
        LockHandle {
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Blocks until the lock is free and holds it while the guard lives.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Returns `true` if both handles refer to the same lock.
    pub fn same_lock(&self, other: &LockHandle) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

/// Registry of named write locks, one per collection name.
///
/// A database owns a single registry; every collection handle it hands out
/// for a given name serializes on the same lock.
///
/// # Examples
///
/// ```
/// use keydoc::common::LockRegistry;
///
/// let registry = LockRegistry::new();
/// let a = registry.get_lock("users");
/// let b = registry.get_lock("users");
/// assert!(a.same_lock(&b));
/// {
///     let _guard = a.acquire();
/// } // released here
/// ```
#[derive(Clone, Default)]
pub struct LockRegistry {
    locks: Arc<DashMap<String, LockHandle>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        LockRegistry {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Gets the lock for the given name, creating it on first use.
    pub fn get_lock(&self, name: &str) -> LockHandle {
        self.locks
            .entry(name.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Drops every lock; handles already given out keep working.
    pub fn clear(&self) {
        self.locks.clear();
    }
}
