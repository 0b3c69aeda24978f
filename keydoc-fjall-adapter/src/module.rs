use crate::config::FjallConfig;
use crate::store::FjallStore;
use keydoc::errors::KeydocResult;
use keydoc::store::{KvStore, StoreModule};

/// Store module for the persistent fjall backend.
///
/// # Examples
///
/// ```rust,no_run
/// use keydoc::collection::CollectionConfig;
/// use keydoc::keydoc::Keydoc;
/// use keydoc_fjall_adapter::FjallModule;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Keydoc::builder()
///     .collection("users", CollectionConfig::new("_id"))
///     .load_module(FjallModule::with_config().db_path("/path/to/db").build())
///     .open_or_create()?;
/// # Ok(())
/// # }
/// ```
pub struct FjallModule {
    store_config: FjallConfig,
}

impl FjallModule {
    #[inline]
    pub fn with_config() -> FjallModuleBuilder {
        FjallModuleBuilder::new()
    }

    pub fn config(&self) -> &FjallConfig {
        &self.store_config
    }
}

impl StoreModule for FjallModule {
    fn get_store(&self) -> KeydocResult<KvStore> {
        let store = FjallStore::new(self.store_config.clone());
        Ok(KvStore::new(store))
    }
}

/// Fluent configuration of a [FjallModule].
pub struct FjallModuleBuilder {
    store_config: FjallConfig,
}

impl FjallModuleBuilder {
    #[inline]
    pub fn new() -> FjallModuleBuilder {
        FjallModuleBuilder {
            store_config: FjallConfig::new(),
        }
    }

    #[inline]
    pub fn db_path(self, db_path: &str) -> Self {
        self.store_config.set_db_path(db_path);
        self
    }

    /// Create the keyspace directory when it does not exist. On by default.
    #[inline]
    pub fn create_if_missing(self, create_if_missing: bool) -> Self {
        self.store_config.set_create_if_missing(create_if_missing);
        self
    }

    /// Refuse to open a keyspace directory that already exists.
    #[inline]
    pub fn error_if_exists(self, error_if_exists: bool) -> Self {
        self.store_config.set_error_if_exists(error_if_exists);
        self
    }

    /// LZ4 block compression for new partitions. On by default.
    #[inline]
    pub fn compression(self, compression: bool) -> Self {
        self.store_config.set_compression(compression);
        self
    }

    #[inline]
    pub fn cache_size(self, cache_size: u64) -> Self {
        self.store_config.set_cache_size(cache_size);
        self
    }

    #[inline]
    pub fn fsync_ms(self, fsync_ms: u16) -> Self {
        self.store_config.set_fsync_ms(fsync_ms);
        self
    }

    #[inline]
    pub fn temporary(self, temporary: bool) -> Self {
        self.store_config.set_temporary(temporary);
        self
    }

    #[inline]
    pub fn commit_before_close(self, commit_before_close: bool) -> Self {
        self.store_config.set_commit_before_close(commit_before_close);
        self
    }

    #[inline]
    pub fn build(self) -> FjallModule {
        FjallModule {
            store_config: self.store_config,
        }
    }
}

impl Default for FjallModuleBuilder {
    fn default() -> Self {
        FjallModuleBuilder::new()
    }
}
