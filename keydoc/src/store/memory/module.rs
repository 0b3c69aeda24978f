use crate::errors::KeydocResult;
use crate::store::memory::InMemoryStore;
use crate::store::{KvStore, StoreModule};

/// Store module for the volatile in-memory backend.
///
/// This is the module a database uses when none is loaded explicitly.
#[derive(Default)]
pub struct InMemoryStoreModule;

impl InMemoryStoreModule {
    pub fn new() -> InMemoryStoreModule {
        InMemoryStoreModule
    }
}

impl StoreModule for InMemoryStoreModule {
    fn get_store(&self) -> KeydocResult<KvStore> {
        Ok(KvStore::new(InMemoryStore::new()))
    }
}
