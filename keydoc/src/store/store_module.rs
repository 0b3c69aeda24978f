use crate::errors::KeydocResult;
use crate::store::KvStore;

/// A pluggable storage backend.
///
/// The database builder loads one store module and asks it for the store to
/// open. Each call returns a fresh, unopened store.
pub trait StoreModule {
    fn get_store(&self) -> KeydocResult<KvStore>;
}
