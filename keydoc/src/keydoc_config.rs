//! Configuration of a keydoc database.

use crate::collection::validation::validate_collection_name;
use crate::collection::CollectionConfig;
use crate::errors::{ErrorKind, KeydocError, KeydocResult};
use crate::store::memory::InMemoryStoreModule;
use crate::store::{KvStore, StoreModule};
use indexmap::IndexMap;

/// Settings a database is opened with: the collections it serves and the
/// store module providing their namespaces.
///
/// The configuration is assembled by [KeydocBuilder](crate::keydoc_builder::KeydocBuilder)
/// and consumed when the database opens.
#[derive(Default)]
pub struct KeydocConfig {
    collections: IndexMap<String, CollectionConfig>,
    store_module: Option<Box<dyn StoreModule>>,
}

impl KeydocConfig {
    pub fn new() -> Self {
        KeydocConfig::default()
    }

    /// Registers a collection.
    ///
    /// The name must be one or more ASCII letters and not already registered;
    /// the key field must not be empty.
    pub fn add_collection(&mut self, name: &str, config: CollectionConfig) -> KeydocResult<()> {
        validate_collection_name(name)?;
        config.validate()?;
        if self.collections.contains_key(name) {
            log::error!("Collection {} is configured more than once", name);
            return Err(KeydocError::new(
                &format!("Collection {} is configured more than once", name),
                ErrorKind::ValidationError,
            ));
        }
        self.collections.insert(name.to_string(), config);
        Ok(())
    }

    /// Registers every collection of a JSON object shaped like
    /// `{"users": {"key": "_id"}, "orders": {"key": "orderId"}}`.
    pub fn add_collections_json(&mut self, json: &str) -> KeydocResult<()> {
        let collections: IndexMap<String, CollectionConfig> =
            serde_json::from_str(json).map_err(|err| {
                log::error!("Invalid collections configuration: {}", err);
                KeydocError::new(
                    &format!("Invalid collections configuration: {}", err),
                    ErrorKind::ValidationError,
                )
            })?;
        for (name, config) in collections {
            self.add_collection(&name, config)?;
        }
        Ok(())
    }

    /// Replaces the store module. Only the last module loaded is used.
    pub fn load_module<T: StoreModule + 'static>(&mut self, module: T) {
        if self.store_module.is_some() {
            log::warn!("Replacing previously loaded store module");
        }
        self.store_module = Some(Box::new(module));
    }

    pub fn collections(&self) -> &IndexMap<String, CollectionConfig> {
        &self.collections
    }

    /// Checks the configuration as a whole.
    pub fn validate(&self) -> KeydocResult<()> {
        if self.collections.is_empty() {
            log::error!("At least one collection must be configured");
            return Err(KeydocError::new(
                "At least one collection must be configured",
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    /// Creates the store from the loaded module, or an in-memory store.
    pub fn create_store(&self) -> KeydocResult<KvStore> {
        match &self.store_module {
            Some(module) => module.get_store(),
            None => {
                log::debug!("No store module loaded, using in-memory store");
                InMemoryStoreModule::new().get_store()
            }
        }
    }
}
